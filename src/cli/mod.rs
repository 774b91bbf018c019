//! Shared plumbing of the `create-vm` and `create-vswitch` binaries.
//!
//! Status text goes to stdout; tracing output goes to stderr.

pub mod create_vm;
pub mod create_vswitch;

use crate::{
    auth::application::service::session_service::SessionService,
    core::{
        domain::{
            error::{VsphereError, VsphereResult},
            model::vsphere_session::{ConnectionOutcome, VsphereSession},
        },
        infrastructure::env_config::EnvConfig,
    },
};
use clap::Parser;
use std::ffi::OsString;
use std::process::ExitCode;
use tracing::warn;

pub const EXIT_GENERIC_FAILURE: u8 = 1;
pub const EXIT_VALIDATION_FAILURE: u8 = 2;
pub const EXIT_REMOTE_FAILURE: u8 = 3;
pub const EXIT_TRANSPORT_OR_AUTH_FAILURE: u8 = 4;

const LABEL_WIDTH: usize = 20;

const INVALID_CERTIFICATE: &str =
    "WARNING: Invalid certificate.\nConnected without certificate verification.";
const INSECURE_BY_CONFIG: &str =
    "WARNING: Certificate verification disabled by VSPHERE_ACCEPT_INVALID_CERTS.";

/// Installs the stderr subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Parses the command line. Usage errors are printed to stdout and map to
/// [`EXIT_VALIDATION_FAILURE`]; `--help` and `--version` map to 0.
pub fn parse_args<C, I, T>(args: I) -> Result<C, u8>
where
    C: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    C::try_parse_from(args).map_err(|err| {
        print!("{}", err.render());
        parse_error_exit_code(&err)
    })
}

fn parse_error_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        EXIT_VALIDATION_FAILURE
    } else {
        0
    }
}

/// Process exit code for a failed run.
#[must_use]
pub fn exit_code(error: &VsphereError) -> u8 {
    match error {
        VsphereError::Validation { .. } => EXIT_VALIDATION_FAILURE,
        VsphereError::Connection(_)
        | VsphereError::Certificate(_)
        | VsphereError::Authentication(_) => EXIT_TRANSPORT_OR_AUTH_FAILURE,
        VsphereError::Api { .. }
        | VsphereError::Task { .. }
        | VsphereError::TaskTimeout { .. }
        | VsphereError::NotFound(_)
        | VsphereError::DiskAttach { .. } => EXIT_REMOTE_FAILURE,
        VsphereError::Configuration(_) => EXIT_GENERIC_FAILURE,
    }
}

/// Prints the outcome of a run and converts it into the exit code.
pub fn finish(result: VsphereResult<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.is_connection() {
                println!("Something went wrong: {}", err);
            } else {
                println!("\n{}", err);
            }
            ExitCode::from(exit_code(&err))
        }
    }
}

/// One row of a settings table: ` Name...............vm1`.
#[must_use]
pub fn setting_line(label: &str, value: impl std::fmt::Display) -> String {
    let label = format!(" {}", label);
    format!("{:.<width$}{}", label, value, width = LABEL_WIDTH)
}

/// Opens the session, telling the user when certificate checks were skipped.
pub async fn connect(env: &EnvConfig) -> VsphereResult<VsphereSession> {
    println!("Attempting to connect...");
    let outcome = SessionService::establish(&env.connection, &env.settings).await;
    let configured = env.connection.accept_invalid_certs();
    if let Some(notice) = connection_notice(&outcome, configured) {
        println!("{}", notice);
    }
    outcome.into_result()
}

fn connection_notice(outcome: &ConnectionOutcome, configured: bool) -> Option<&'static str> {
    match outcome {
        ConnectionOutcome::Connected(_) => Some("Success"),
        ConnectionOutcome::ConnectedInsecure(_) if configured => Some(INSECURE_BY_CONFIG),
        ConnectionOutcome::ConnectedInsecure(_) => Some(INVALID_CERTIFICATE),
        ConnectionOutcome::Failed(_) => None,
    }
}

/// Logs out; a failed logout does not change the run's outcome.
pub async fn disconnect(session: VsphereSession) {
    if let Err(err) = session.close().await {
        warn!(error = %err, "logout failed");
    }
}
