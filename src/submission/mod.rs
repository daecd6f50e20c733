//! # Score Submission
//!
//! Turns the loosely-typed POST payload into a well-typed [`ScoreSubmission`],
//! or a [`SubmissionError`] explaining why it was rejected.

mod errors;
mod validator;

pub use errors::{SubmissionError, SubmissionResult};
pub use validator::{truncate_name, ScoreSubmission, DEFAULT_NAME, NAME_MAX_CHARS};
