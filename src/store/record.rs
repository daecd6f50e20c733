//! Score record model

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One stored high-score entry.
///
/// Records are create-only: nothing in this crate updates or deletes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Store-assigned identity, strictly increasing in insertion order
    pub id: i64,
    /// Player label, at most 50 characters
    pub name: String,
    pub score: i64,
    pub attempts: i64,
    /// RFC 3339 UTC timestamp, exactly as stored
    pub created_at: String,
}

/// Leaderboard projection of a record, as served over HTTP.
///
/// Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: i64,
    pub attempts: i64,
    pub created_at: String,
}

impl From<ScoreRecord> for LeaderboardEntry {
    fn from(record: ScoreRecord) -> Self {
        Self {
            name: record.name,
            score: record.score,
            attempts: record.attempts,
            created_at: record.created_at,
        }
    }
}

/// Formats an instant the way `created_at` is stored.
///
/// Fixed width (microseconds, `Z` suffix) so that string order matches time order.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
