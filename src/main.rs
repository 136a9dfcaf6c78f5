//! pyrelease CLI entrypoint.
//!
//! Thin wrapper over the `cli` module: hand the arguments to the runner and
//! exit with the status it reports.

use std::ffi::OsString;
use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    let tokens: Vec<OsString> = std::env::args_os().skip(1).collect();
    let stdout = std::io::stdout();
    ExitCode::from(cli::run(tokens, &mut stdout.lock()))
}
