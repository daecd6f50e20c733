//! # SQLite Score Store
//!
//! File-backed persistence for [`ScoreRecord`]s.
//!
//! There is no process-wide connection. Every caller acquires its own
//! [`StoreConnection`] through [`ScoreStore::connect`] or
//! [`ScoreStore::with_connection`], and the connection is closed when that
//! handle goes out of scope, whichever way the caller exits. Concurrent
//! writers are serialized by SQLite itself; the busy timeout makes them wait
//! for the file lock instead of failing straight away.
//!
//! The database is switched to write-ahead logging when the store is opened.
//! The mode is recorded in the file, so readers stop contending with writers
//! on every later connection too.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use tracing::{debug, warn};

use super::errors::{StoreError, StoreResult};
use super::record::{format_timestamp, ScoreRecord};

/// Size of the leaderboard window served to clients
pub const LEADERBOARD_LIMIT: usize = 20;

/// Default busy timeout (ms)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS highscores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    score INTEGER NOT NULL,
    attempts INTEGER NOT NULL,
    created_at TEXT NOT NULL
)";

const INSERT_SQL: &str =
    "INSERT INTO highscores (name, score, attempts, created_at) VALUES (?1, ?2, ?3, ?4)";

// created_at is fixed-width RFC 3339, so text order is time order. id settles
// identical timestamps in insertion order.
const LIST_TOP_SQL: &str = "SELECT id, name, score, attempts, created_at FROM highscores \
     ORDER BY score DESC, created_at ASC, id ASC LIMIT ?1";

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path to the database file
    pub path: PathBuf,
    /// How long a connection waits on a locked database before failing
    pub busy_timeout_ms: u64,
}

impl StoreConfig {
    /// Config for the given file with the default busy timeout
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Handle to the score database.
///
/// Cheap to clone; holds no open connection.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    config: StoreConfig,
}

impl ScoreStore {
    /// Opens the store, creating the database file and table if absent.
    ///
    /// A connection is opened once and closed again so that an unusable
    /// path is reported here rather than on the first request.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;

        let store = Self { config };
        let connection = store.connect()?;
        connection.enable_wal()?;
        connection.close()?;
        debug!(path = %store.path().display(), "score store ready");
        Ok(store)
    }

    /// Path to the database file
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Acquires a fresh connection with the schema in place.
    pub fn connect(&self) -> StoreResult<StoreConnection> {
        validate_store_path(&self.config.path)?;

        let conn = Connection::open(&self.config.path)?;
        conn.busy_timeout(Duration::from_millis(self.config.busy_timeout_ms))?;

        let connection = StoreConnection { conn };
        connection.initialize()?;
        Ok(connection)
    }

    /// Runs `op` against a freshly acquired connection and releases it afterwards.
    ///
    /// The connection is released on success and on failure alike. A failure
    /// to close after a successful operation is logged; the operation's own
    /// result is what the caller gets.
    pub fn with_connection<T, F>(&self, op: F) -> StoreResult<T>
    where
        F: FnOnce(&StoreConnection) -> StoreResult<T>,
    {
        let connection = self.connect()?;
        let result = op(&connection);

        if let Err(err) = connection.close() {
            warn!(error = %err, "failed to close score store connection");
        }

        result
    }
}

/// An open connection to the score database.
///
/// Closed on drop.
#[derive(Debug)]
pub struct StoreConnection {
    conn: Connection,
}

impl StoreConnection {
    /// Creates the `highscores` table if it does not exist. Idempotent.
    pub fn initialize(&self) -> StoreResult<()> {
        self.conn.execute_batch(CREATE_TABLE_SQL)?;
        Ok(())
    }

    /// Switches the database file to write-ahead logging.
    ///
    /// Some filesystems cannot host a WAL; the database then keeps its
    /// current journal mode.
    pub fn enable_wal(&self) -> StoreResult<()> {
        let mode: String = self
            .conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        if !mode.eq_ignore_ascii_case("wal") {
            warn!(%mode, "write-ahead logging unavailable, keeping journal mode");
        }
        Ok(())
    }

    /// Current journal mode, lowercase as SQLite reports it
    pub fn journal_mode(&self) -> StoreResult<String> {
        let mode = self
            .conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))?;
        Ok(mode)
    }

    /// Inserts a record stamped with the current UTC time and returns its id.
    ///
    /// `name` is expected to be validated and length-bounded already.
    pub fn insert(&self, name: &str, score: i64, attempts: i64) -> StoreResult<i64> {
        self.insert_at(name, score, attempts, Utc::now())
    }

    /// Inserts a record stamped with `at` and returns its id.
    pub fn insert_at(
        &self,
        name: &str,
        score: i64,
        attempts: i64,
        at: DateTime<Utc>,
    ) -> StoreResult<i64> {
        let created_at = format_timestamp(at);
        self.conn.execute(INSERT_SQL, params![name, score, attempts, created_at])?;

        let id = self.conn.last_insert_rowid();
        debug!(id, score, attempts, "score inserted");
        Ok(id)
    }

    /// Returns up to `limit` records, highest score first, earlier entries
    /// first among equal scores. Empty when nothing is stored.
    pub fn list_top(&self, limit: usize) -> StoreResult<Vec<ScoreRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = self.conn.prepare(LIST_TOP_SQL)?;
        let records = stmt
            .query_map(params![limit], read_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Number of stored records
    pub fn count(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM highscores", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Closes the connection, reporting any error the close produces.
    pub fn close(self) -> StoreResult<()> {
        self.conn.close().map_err(|(_, err)| StoreError::Database(err))
    }
}

fn read_record(row: &Row<'_>) -> rusqlite::Result<ScoreRecord> {
    Ok(ScoreRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        score: row.get(2)?,
        attempts: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn validate_store_path(path: &Path) -> StoreResult<()> {
    if path.as_os_str().is_empty() {
        return Err(StoreError::InvalidPath("store path is empty".to_string()));
    }
    if path.is_dir() {
        return Err(StoreError::InvalidPath(format!(
            "{} is a directory",
            path.display()
        )));
    }
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> StoreResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, ScoreStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = ScoreStore::open(StoreConfig::new(temp_dir.path().join("scores.db"))).unwrap();
        (temp_dir, store)
    }

    fn at(second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, second).unwrap()
    }

    #[test]
    fn test_open_creates_file_and_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/scores.db");

        let store = ScoreStore::open(StoreConfig::new(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_open_enables_write_ahead_log() {
        let (_dir, store) = setup_store();

        // The mode lives in the file, so a fresh connection sees it
        let mode = store.with_connection(|conn| conn.journal_mode()).unwrap();
        assert_eq!(mode, "wal");
    }

    #[test]
    fn test_open_rejects_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = ScoreStore::open(StoreConfig::new(temp_dir.path())).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));
    }

    #[test]
    fn test_open_rejects_empty_path() {
        let err = ScoreStore::open(StoreConfig::new("")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (_dir, store) = setup_store();
        let conn = store.connect().unwrap();
        conn.insert("Alice", 10, 1).unwrap();

        conn.initialize().unwrap();
        conn.initialize().unwrap();
        drop(conn);

        // Reopening runs initialize again and must keep existing rows
        let reopened = ScoreStore::open(StoreConfig::new(store.path())).unwrap();
        let count = reopened.with_connection(|conn| conn.count()).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_list_top_empty() {
        let (_dir, store) = setup_store();
        let records = store
            .with_connection(|conn| conn.list_top(LEADERBOARD_LIMIT))
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let (_dir, store) = setup_store();
        let conn = store.connect().unwrap();

        let first = conn.insert("A", 1, 1).unwrap();
        let second = conn.insert("B", 1, 1).unwrap();
        let third = conn.insert("C", 1, 1).unwrap();

        assert!(first < second);
        assert!(second < third);
    }

    #[test]
    fn test_insert_is_visible_to_other_connections() {
        let (_dir, store) = setup_store();
        let id = store
            .with_connection(|conn| conn.insert_at("Alice", 100, 3, at(0)))
            .unwrap();

        let records = store.with_connection(|conn| conn.list_top(20)).unwrap();
        assert_eq!(
            records,
            vec![ScoreRecord {
                id,
                name: "Alice".to_string(),
                score: 100,
                attempts: 3,
                created_at: "2024-05-01T12:00:00.000000Z".to_string(),
            }]
        );
    }

    #[test]
    fn test_list_top_orders_by_score_then_time() {
        let (_dir, store) = setup_store();
        let conn = store.connect().unwrap();
        conn.insert_at("A", 50, 1, at(0)).unwrap();
        conn.insert_at("B", 80, 1, at(1)).unwrap();
        conn.insert_at("C", 80, 1, at(2)).unwrap();

        let names: Vec<String> = conn
            .list_top(LEADERBOARD_LIMIT)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_list_top_tie_on_timestamp_uses_insertion_order() {
        let (_dir, store) = setup_store();
        let conn = store.connect().unwrap();
        conn.insert_at("first", 10, 1, at(5)).unwrap();
        conn.insert_at("second", 10, 1, at(5)).unwrap();

        let names: Vec<String> = conn
            .list_top(LEADERBOARD_LIMIT)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_list_top_respects_limit() {
        let (_dir, store) = setup_store();
        let conn = store.connect().unwrap();
        for i in 0..25 {
            conn.insert(&format!("p{}", i), i, 1).unwrap();
        }

        let records = conn.list_top(LEADERBOARD_LIMIT).unwrap();
        assert_eq!(records.len(), 20);
        assert_eq!(records[0].score, 24);
        assert_eq!(records[19].score, 5);
        assert_eq!(conn.count().unwrap(), 25);
    }

    #[test]
    fn test_with_connection_propagates_error() {
        let (_dir, store) = setup_store();
        let result: StoreResult<()> = store.with_connection(|conn| {
            conn.conn.execute_batch("SELECT * FROM missing_table")?;
            Ok(())
        });
        assert!(matches!(result, Err(StoreError::Database(_))));

        // Store stays usable after a failed operation
        assert_eq!(store.with_connection(|conn| conn.count()).unwrap(), 0);
    }

    #[test]
    fn test_schema_mismatch_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("legacy.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch("CREATE TABLE highscores (id INTEGER PRIMARY KEY, who TEXT)")
                .unwrap();
        }

        let store = ScoreStore::open(StoreConfig::new(&path)).unwrap();
        let result = store.with_connection(|conn| conn.list_top(LEADERBOARD_LIMIT));
        assert!(matches!(result, Err(StoreError::Database(_))));
    }
}
