//! High Score HTTP Routes
//!
//! - `GET /highscores` - the Top-N leaderboard
//! - `POST /highscores` - submit a new score
//!
//! Store calls block, so they run on tokio's blocking pool. Each call
//! acquires its own connection and releases it before the response is built.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use super::errors::ApiError;
use crate::store::{LeaderboardEntry, ScoreStore, StoreResult, LEADERBOARD_LIMIT};
use crate::submission::ScoreSubmission;

// ==================
// Shared State
// ==================

/// High score state shared across handlers
pub struct HighscoreState {
    pub store: ScoreStore,
}

impl HighscoreState {
    pub fn new(store: ScoreStore) -> Self {
        Self { store }
    }
}

// ==================
// Request/Response Types
// ==================

/// Body returned for an accepted submission
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

// ==================
// High Score Routes
// ==================

/// Create high score routes
pub fn highscore_routes(state: Arc<HighscoreState>) -> Router {
    Router::new()
        .route(
            "/highscores",
            get(list_highscores_handler).post(submit_highscore_handler),
        )
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn list_highscores_handler(
    State(state): State<Arc<HighscoreState>>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let store = state.store.clone();
    let records =
        run_blocking(move || store.with_connection(|conn| conn.list_top(LEADERBOARD_LIMIT)))
            .await?;

    Ok(Json(records.into_iter().map(LeaderboardEntry::from).collect()))
}

async fn submit_highscore_handler(
    State(state): State<Arc<HighscoreState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<StatusResponse>), ApiError> {
    let submission = ScoreSubmission::from_json_bytes(&body)?;

    let store = state.store.clone();
    run_blocking(move || {
        store.with_connection(|conn| {
            conn.insert(&submission.name, submission.score, submission.attempts)
        })
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(StatusResponse {
            status: "ok".to_string(),
        }),
    ))
}

/// Runs a store operation on the blocking pool.
async fn run_blocking<T, F>(op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ApiError::Worker(e.to_string()))?
        .map_err(ApiError::from)
}
