//! Error types for the editing session.

use std::path::PathBuf;

use policy_loader::LoaderError;
use policy_normalizer::NormalizeError;
use thiserror::Error;

/// Errors surfaced by [`EditorSession`](crate::EditorSession).
#[derive(Debug, Error)]
pub enum SessionError {
    /// The schema could not be fetched or decoded.
    #[error("could not load schema: {0}")]
    Load(#[from] LoaderError),

    /// The schema text could not be normalized.
    #[error("could not load schema: {0}")]
    Normalize(#[from] NormalizeError),

    /// A newer load was started before this one completed.
    #[error("load #{generation} superseded by load #{latest}")]
    Superseded {
        /// Generation of the discarded load.
        generation: u64,
        /// Most recently issued generation.
        latest: u64,
    },

    /// No schema has been loaded yet.
    #[error("no schema loaded")]
    NotLoaded,

    /// Unknown key or a value that does not fit the policy type.
    #[error(transparent)]
    Policy(#[from] policy_primitives::Error),

    /// User text could not be parsed for the policy type.
    #[error("invalid input for `{key}`: {reason}")]
    InvalidInput {
        /// Policy key being edited.
        key: String,
        /// Why the text was rejected.
        reason: String,
    },

    /// Export document could not be serialized.
    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Export file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    /// Returns `true` for failures that abort a load (fetch, decode, parse,
    /// schema shape).
    #[must_use]
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::Load(_) | Self::Normalize(_))
    }
}

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
