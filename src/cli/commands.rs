//! CLI command implementations

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{init_logging, DEFAULT_LOG_FILTER};
use crate::store::{LeaderboardEntry, ScoreStore, StoreConfig, LEADERBOARD_LIMIT};

use super::args::{Cli, Command, ServeArgs};
use super::errors::{CliError, CliResult};

/// Parse arguments, install logging and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging(cli.log_format, DEFAULT_LOG_FILTER).map_err(CliError::boot_failed)?;
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve(args) => serve(&args),
        Command::Init(args) => init(&args.database),
        Command::Top(args) => top(&args.database, &mut io::stdout(), &mut io::stderr()),
    }
}

/// Build the server config: file (if any), then flag and environment overrides.
pub fn resolve_config(args: &ServeArgs) -> CliResult<HttpServerConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => HttpServerConfig::default(),
    };

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database) = &args.database {
        config.database_path = database.clone();
    }

    Ok(config)
}

fn load_config(path: &Path) -> CliResult<HttpServerConfig> {
    let text = fs::read_to_string(path).map_err(|e| {
        CliError::config_error(format!("cannot read {}: {}", path.display(), e))
    })?;

    HttpServerConfig::from_json_str(&text)
        .map_err(|e| CliError::config_error(format!("invalid {}: {}", path.display(), e)))
}

/// Open the store and serve HTTP until shutdown
pub fn serve(args: &ServeArgs) -> CliResult<()> {
    let config = resolve_config(args)?;

    let store = ScoreStore::open(config.store_config())?;
    info!(database = %store.path().display(), "score store opened");

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("cannot start runtime: {}", e)))?;

    runtime
        .block_on(HttpServer::new(config, store).start())
        .map_err(|e| CliError::boot_failed(format!("server error: {}", e)))
}

/// Create the database file and table. Safe to repeat.
pub fn init(database: &Path) -> CliResult<()> {
    let store = ScoreStore::open(StoreConfig::new(database))?;
    info!(database = %store.path().display(), "score store initialized");
    Ok(())
}

/// Write the current leaderboard to `out` in the API's JSON shape, and a
/// one-line count to `summary` so the JSON stays pipeable.
pub fn top<W: Write, S: Write>(database: &Path, out: &mut W, summary: &mut S) -> CliResult<()> {
    let store = ScoreStore::open(StoreConfig::new(database))?;
    let (records, total) =
        store.with_connection(|conn| Ok((conn.list_top(LEADERBOARD_LIMIT)?, conn.count()?)))?;
    let entries: Vec<LeaderboardEntry> = records.into_iter().map(LeaderboardEntry::from).collect();

    serde_json::to_writer_pretty(&mut *out, &entries)?;
    writeln!(out)?;
    out.flush()?;

    writeln!(summary, "{} of {} scores shown", entries.len(), total)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_config_defaults() {
        let config = resolve_config(&ServeArgs::default()).unwrap();
        assert_eq!(config, HttpServerConfig::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("highscores.json");
        fs::write(
            &config_path,
            r#"{"host": "127.0.0.1", "port": 7000, "busy_timeout_ms": 100}"#,
        )
        .unwrap();

        let args = ServeArgs {
            config: Some(config_path),
            port: Some(9000),
            database: Some(PathBuf::from("/data/scores.db")),
            ..Default::default()
        };
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_path, PathBuf::from("/data/scores.db"));
        assert_eq!(config.busy_timeout_ms, 100);
    }

    #[test]
    fn test_missing_config_file() {
        let args = ServeArgs {
            config: Some(PathBuf::from("/nonexistent/highscores.json")),
            ..Default::default()
        };
        let err = resolve_config(&args).unwrap_err();
        assert_eq!(err.code().code(), "HIGHSCORES_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_init_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let database = temp_dir.path().join("scores.db");

        init(&database).unwrap();
        init(&database).unwrap();
        assert!(database.exists());
    }

    #[test]
    fn test_top_prints_leaderboard() {
        let temp_dir = TempDir::new().unwrap();
        let database = temp_dir.path().join("scores.db");
        let store = ScoreStore::open(StoreConfig::new(&database)).unwrap();
        store
            .with_connection(|conn| {
                conn.insert("Low", 1, 1)?;
                conn.insert("High", 99, 2)
            })
            .unwrap();

        let mut out = Vec::new();
        let mut summary = Vec::new();
        top(&database, &mut out, &mut summary).unwrap();

        let entries: Vec<LeaderboardEntry> = serde_json::from_slice(&out).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Low"]);
        assert_eq!(String::from_utf8(summary).unwrap(), "2 of 2 scores shown\n");
    }

    #[test]
    fn test_top_summary_counts_beyond_window() {
        let temp_dir = TempDir::new().unwrap();
        let database = temp_dir.path().join("scores.db");
        let store = ScoreStore::open(StoreConfig::new(&database)).unwrap();
        store
            .with_connection(|conn| {
                for i in 0..25 {
                    conn.insert(&format!("p{}", i), i, 1)?;
                }
                Ok(())
            })
            .unwrap();

        let mut out = Vec::new();
        let mut summary = Vec::new();
        top(&database, &mut out, &mut summary).unwrap();

        let entries: Vec<LeaderboardEntry> = serde_json::from_slice(&out).unwrap();
        assert_eq!(entries.len(), LEADERBOARD_LIMIT);
        assert_eq!(String::from_utf8(summary).unwrap(), "20 of 25 scores shown\n");
    }

    #[test]
    fn test_top_on_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        let mut summary = Vec::new();
        top(&temp_dir.path().join("empty.db"), &mut out, &mut summary).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), "[]");
        assert_eq!(String::from_utf8(summary).unwrap(), "0 of 0 scores shown\n");
    }
}
