//! `tokcat` command-line entry point

use std::process::ExitCode;

fn main() -> ExitCode {
    tokcat::cli::run_cli()
}
