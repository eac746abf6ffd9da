use std::process::ExitCode;

use anyhow::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Default filter for a given `-v` count.
fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Otherwise `warn`, raised to `info`/`debug` by `-v`/`-vv`.
/// * Writes to stderr so reports on stdout stay pipeable.
/// * Strips timestamps and target names to keep CLI output clean.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    // A second initialisation (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}

/// Logs a failed command with its full error chain and maps the outcome to
/// the process exit code.
pub fn command_exit_code(
    command: &'static str,
    result: &Result<()>,
) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(command, "command failed: {error:#}");
            ExitCode::FAILURE
        }
    }
}
