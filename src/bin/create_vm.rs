use std::process::ExitCode;
use vsphere_provision::cli::{self, create_vm::CreateVmCommand};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let command: CreateVmCommand = match cli::parse_args(std::env::args_os()) {
        Ok(command) => command,
        Err(code) => return ExitCode::from(code),
    };
    cli::init_tracing();
    cli::finish(cli::create_vm::run(command).await)
}
