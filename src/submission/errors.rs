//! Submission error types
//!
//! Every variant is a client error: the request is rejected and nothing is stored.

use thiserror::Error;

/// Result type for submission validation
pub type SubmissionResult<T> = Result<T, SubmissionError>;

/// Reasons a score submission is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// Body is not parseable JSON
    #[error("Request body is not valid JSON: {0}")]
    MalformedJson(String),

    /// Body is JSON but not an object
    #[error("Request body must be a JSON object")]
    NotAnObject,

    /// `name` present but not a string
    #[error("Field 'name' must be a string")]
    InvalidName,

    /// `score` or `attempts` present but not coercible to an integer
    #[error("Field '{field}' must be an integer")]
    InvalidInteger {
        /// Offending field
        field: &'static str,
    },
}

impl SubmissionError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SubmissionError::MalformedJson(_) => "HIGHSCORES_MALFORMED_JSON",
            SubmissionError::NotAnObject => "HIGHSCORES_NOT_AN_OBJECT",
            SubmissionError::InvalidName => "HIGHSCORES_INVALID_NAME",
            SubmissionError::InvalidInteger { .. } => "HIGHSCORES_INVALID_INTEGER",
        }
    }
}
