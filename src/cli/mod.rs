//! CLI module for the high score service
//!
//! Provides command-line interface for:
//! - serve: Open the store and run the HTTP server
//! - init: Create the database file and table
//! - top: Print the leaderboard

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, DatabaseArgs, ServeArgs};
pub use commands::{init, resolve_config, run, run_command, serve, top};
pub use errors::{CliError, CliErrorCode, CliResult};
