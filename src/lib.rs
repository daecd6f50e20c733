//! highscores - records and serves a ranked list of game high scores
//!
//! Two HTTP routes over a single SQLite table:
//! `GET /api/highscores` lists the Top 20, `POST /api/highscores` records a score.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod store;
pub mod submission;
