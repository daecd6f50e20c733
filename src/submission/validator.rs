//! Submission validator
//!
//! Coercion rules:
//! - `name`: absent or null gives "Anon"; strings are cut to the first 50 characters
//! - `score`, `attempts`: absent or null gives 0; integers are taken as-is,
//!   finite floats are truncated toward zero, strings must hold a base-10 integer
//! - anything else is rejected, never silently defaulted
//! - unknown fields are ignored

use serde_json::{Map, Number, Value};

use super::errors::{SubmissionError, SubmissionResult};

/// Maximum stored name length, in characters
pub const NAME_MAX_CHARS: usize = 50;

/// Name used when the submission has none
pub const DEFAULT_NAME: &str = "Anon";

/// A validated score submission, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSubmission {
    pub name: String,
    pub score: i64,
    pub attempts: i64,
}

impl ScoreSubmission {
    /// Validates a raw request body.
    ///
    /// An empty body is read as `{}`.
    pub fn from_json_bytes(body: &[u8]) -> SubmissionResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::from_value(&Value::Object(Map::new()));
        }

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| SubmissionError::MalformedJson(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Validates an already-parsed JSON document.
    pub fn from_value(value: &Value) -> SubmissionResult<Self> {
        let fields = value.as_object().ok_or(SubmissionError::NotAnObject)?;

        Ok(Self {
            name: coerce_name(fields.get("name"))?,
            score: coerce_integer("score", fields.get("score"))?,
            attempts: coerce_integer("attempts", fields.get("attempts"))?,
        })
    }
}

/// Keeps the first [`NAME_MAX_CHARS`] characters of `name`.
pub fn truncate_name(name: &str) -> String {
    name.chars().take(NAME_MAX_CHARS).collect()
}

fn coerce_name(value: Option<&Value>) -> SubmissionResult<String> {
    match value {
        None | Some(Value::Null) => Ok(DEFAULT_NAME.to_string()),
        Some(Value::String(name)) => Ok(truncate_name(name)),
        Some(_) => Err(SubmissionError::InvalidName),
    }
}

fn coerce_integer(field: &'static str, value: Option<&Value>) -> SubmissionResult<i64> {
    let invalid = || SubmissionError::InvalidInteger { field };

    match value {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(number)) => number_to_i64(number).ok_or_else(invalid),
        Some(Value::String(text)) => text.trim().parse::<i64>().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

fn number_to_i64(number: &Number) -> Option<i64> {
    if let Some(value) = number.as_i64() {
        return Some(value);
    }
    // Unsigned beyond i64::MAX
    if number.is_u64() {
        return None;
    }

    let truncated = number.as_f64()?.trunc();
    // i64::MAX as f64 rounds up to 2^63, hence the strict bound
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}
