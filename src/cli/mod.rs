//! CLI module for the add-on provider
//!
//! Provides command-line interface for:
//! - start: Load configuration, boot the HTTP server, serve until stopped
//! - check: Validate a configuration file without binding a socket

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check, run, run_command, start};
pub use errors::{CliError, CliErrorCode, CliResult};
