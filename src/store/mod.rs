//! # Score Store
//!
//! Durable persistence of high-score records in a single SQLite table.
//!
//! The store owns the `highscores` table exclusively. Operations:
//!
//! - `initialize` - create the table if absent (idempotent, run on every acquisition)
//! - `insert` - append a record, returning its store-assigned id
//! - `list_top` - the leaderboard: score descending, earlier entries first on ties

mod errors;
mod record;
mod sqlite;

pub use errors::{StoreError, StoreResult};
pub use record::{format_timestamp, LeaderboardEntry, ScoreRecord};
pub use sqlite::{
    ScoreStore, StoreConfig, StoreConnection, DEFAULT_BUSY_TIMEOUT_MS, LEADERBOARD_LIMIT,
};
