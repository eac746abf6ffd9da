use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use irpf_cli::cli::{self, Cli};
use irpf_cli::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = cli::run(&cli, &mut out).and_then(|()| out.flush().map_err(Into::into));

    logging::command_exit_code(cli.command.name(), &result)
}
