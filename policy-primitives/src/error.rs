//! Shared error definitions for policy primitives.

use thiserror::Error;

use crate::ValueType;

/// Result alias used throughout the policy workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while manipulating policy primitive types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The supplied policy key failed validation.
    #[error("invalid policy key `{key}`: {reason}")]
    InvalidPolicyKey {
        /// The offending key.
        key: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// A value does not fit the policy's declared value type.
    #[error("policy `{key}` expects {expected}, got {found}")]
    TypeMismatch {
        /// Key of the policy being assigned.
        key: String,
        /// Declared value type of the policy.
        expected: ValueType,
        /// Kind of the rejected value.
        found: &'static str,
    },

    /// No policy with the given key exists in the collection.
    #[error("unknown policy `{key}`")]
    UnknownPolicy {
        /// Key that was looked up.
        key: String,
    },
}
