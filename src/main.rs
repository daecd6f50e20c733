//! High score service entry point
//!
//! Parses arguments and dispatches via `cli::run`; on failure prints the
//! error to stderr and exits non-zero.

use highscores::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
