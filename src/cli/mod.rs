//! CLI module for syncguard
//!
//! Provides command-line interface for:
//! - check: Decide one write read from stdin
//! - lint: Load a schema and list its document types

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, decide, lint, lint_report, run_command, CheckRequest};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}
