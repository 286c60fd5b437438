//! Error types for the validation engine.
//!
//! Two kinds of failure exist at runtime. A [`FieldError`] is produced while
//! checking a single value; it is a local, recoverable condition that the
//! schema catches and turns into an entry of the shared error list.
//! [`InvalidParams`] aggregates the full ordered list and is the only error
//! type that crosses the schema boundary.
//!
//! Malformed field declarations (bad length bounds, missing patterns,
//! mismatched bound types) are programmer errors: constructors and the
//! schema builder panic immediately instead of routing them through the
//! error list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Error from a single failed check on one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("[{code}] {message}")]
pub struct FieldError {
    /// The check code (e.g. "null", "type", "length", "range", "choices")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Structured parameters of the failed check (min/max/actual)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, serde_json::Value>,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            params: BTreeMap::new(),
        }
    }

    /// Attach a structured parameter to the error.
    pub fn param(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.params.insert(key.into(), v);
        }
        self
    }

    /// Replace the message, keeping code and params.
    ///
    /// Used by fields that carry a `description`: the field-level message
    /// wins over the generated check message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// One entry of the aggregated error list: a field error plus the raw-input
/// key it belongs to. Whole-object errors carry no key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(flatten)]
    pub error: FieldError,
}

impl ParamError {
    /// An error attached to a raw-input key.
    pub fn keyed(key: impl Into<String>, error: FieldError) -> Self {
        Self {
            key: Some(key.into()),
            error,
        }
    }

    /// An error with no associated key (whole-object or non-mapping input).
    pub fn object(error: FieldError) -> Self {
        Self { key: None, error }
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{key}: {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Aggregate error carrying every collected field and object error, in
/// discovery order.
///
/// This is the `Err` arm of [`Schema::validate`](crate::Schema::validate);
/// adapters translate it into a transport-appropriate response via
/// [`to_json`](InvalidParams::to_json).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("Invalid params: {}", format_errors(.errors))]
pub struct InvalidParams {
    pub errors: Vec<ParamError>,
}

fn format_errors(errors: &[ParamError]) -> String {
    errors
        .iter()
        .map(ParamError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl InvalidParams {
    /// Create an aggregate error from collected entries.
    pub fn new(errors: Vec<ParamError>) -> Self {
        Self { errors }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// All errors recorded for a given key.
    pub fn get(&self, key: &str) -> Vec<&FieldError> {
        self.errors
            .iter()
            .filter(|e| e.key.as_deref() == Some(key))
            .map(|e| &e.error)
            .collect()
    }

    /// Render the adapter-facing JSON error body:
    ///
    /// ```json
    /// {
    ///   "error": {
    ///     "type": "invalid_params",
    ///     "message": "Invalid params",
    ///     "fields": [
    ///       {"key": "email", "code": "email", "message": "..."}
    ///     ]
    ///   }
    /// }
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "type": "invalid_params",
                "message": "Invalid params",
                "fields": self.errors,
            }
        })
    }
}
