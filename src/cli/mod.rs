// CLI module
// Command-line interface, argument parsing and command dispatch

mod args;
mod commands;

pub use args::{CliArgs, Comando, EditarArgs, RegistrarArgs};
pub use commands::ejecutar;

use clap::Parser;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing required arguments, or
/// the --help flag), clap displays the error or help text and exits the
/// process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
