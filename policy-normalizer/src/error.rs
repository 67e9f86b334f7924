//! Error types for schema normalization.

use thiserror::Error;

use crate::DetectedFormat;

/// Errors that abort a whole normalization run.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The text is not valid JSON, even after the pseudo-JSON rewrite when it
    /// was attempted.
    #[error("schema is not valid {format}: {source}")]
    Parse {
        /// Format the parser was reading when it gave up.
        format: DetectedFormat,
        /// Underlying JSON error, retained for diagnostics.
        #[source]
        source: serde_json::Error,
    },

    /// The text parsed, but its structure matches no recognised schema shape.
    #[error("unrecognised schema shape: {reason}")]
    Schema {
        /// Human-readable reason describing the mismatch.
        reason: String,
    },
}

impl NormalizeError {
    /// Helper to construct schema errors from string-like values.
    #[must_use]
    pub fn schema(reason: impl Into<String>) -> Self {
        Self::Schema {
            reason: reason.into(),
        }
    }
}

/// Result alias for normalization.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// A single policy entry that was skipped.
///
/// Field errors never abort a load; they are collected and returned next to
/// the policies that did normalize.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("skipped entry #{position} in `{group}`: {reason}")]
pub struct FieldError {
    /// Group or category the entry was found in.
    pub group: String,
    /// Zero-based position of the entry inside its container.
    pub position: usize,
    /// Why the entry was skipped.
    pub reason: String,
}
