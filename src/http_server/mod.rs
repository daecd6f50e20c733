//! # High Score HTTP Server Module
//!
//! Routes HTTP requests to the score store.
//!
//! # Endpoints
//!
//! - `GET /api/highscores` - Top 20 scores as a JSON array
//! - `POST /api/highscores` - Record a score, `201 {"status": "ok"}`
//! - `GET /health` - Liveness check

pub mod config;
pub mod errors;
pub mod highscore_routes;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ErrorResponse};
pub use highscore_routes::{highscore_routes, HighscoreState, StatusResponse};
pub use observability_routes::HealthResponse;
pub use server::HttpServer;
