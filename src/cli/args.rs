//! CLI argument definitions using clap
//!
//! Commands:
//! - highscores serve [--config <path>] [--host <host>] [--port <port>] [--database <path>]
//! - highscores init [--database <path>]
//! - highscores top [--database <path>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::LogFormat;

/// High score service - records and serves a ranked list of game scores
#[derive(Parser, Debug)]
#[command(name = "highscores")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Create the database file and table if missing
    Init(DatabaseArgs),

    /// Print the current leaderboard as JSON
    Top(DatabaseArgs),
}

/// Server options. Flags and environment override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Host to bind to [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to [default: 5000]
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Database file [default: highscores.db]
    #[arg(long, env = "HIGHSCORES_DB")]
    pub database: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Database file
    #[arg(long, env = "HIGHSCORES_DB", default_value = "highscores.db")]
    pub database: PathBuf,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
