use std::process::ExitCode;
use vsphere_provision::cli::{self, create_vswitch::CreateVswitchCommand};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let command: CreateVswitchCommand = match cli::parse_args(std::env::args_os()) {
        Ok(command) => command,
        Err(code) => return ExitCode::from(code),
    };
    cli::init_tracing();
    cli::finish(cli::create_vswitch::run(command).await)
}
