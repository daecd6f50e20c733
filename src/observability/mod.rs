//! Observability for the high score service
//!
//! Logging goes through `tracing`; this module only installs the subscriber.

mod logger;

pub use logger::{env_filter, init_logging, LogFormat, DEFAULT_LOG_FILTER};
