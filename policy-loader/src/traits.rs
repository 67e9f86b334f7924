//! Shared loader trait and error type.

use async_trait::async_trait;
use thiserror::Error;

use crate::source::SchemaSource;

/// Result alias used by schema loaders.
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Error type shared by loader implementations.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The source could not be read (network failure, non-success status,
    /// missing file, timeout).
    #[error("failed to fetch schema from {location}: {reason}")]
    Fetch {
        /// Location that was being read.
        location: String,
        /// Additional context for the failure.
        reason: String,
    },

    /// The payload was read but could not be decoded into text.
    #[error("failed to decode schema from {location}: {reason}")]
    Decode {
        /// Location that was being read.
        location: String,
        /// Additional context for the failure.
        reason: String,
    },

    /// Loader or source descriptor is misconfigured.
    #[error("loader not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },
}

impl LoaderError {
    /// Convenience constructor for fetch failures.
    #[must_use]
    pub fn fetch(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Convenience constructor for decode failures.
    #[must_use]
    pub fn decode(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}

/// Trait implemented by all schema loaders.
///
/// A loader performs a single read attempt and never retries; callers decide
/// whether to try again.
#[async_trait]
pub trait SchemaLoader: Send + Sync {
    /// Reads the source and returns its decoded text unmodified.
    async fn load(&self, source: &SchemaSource) -> LoaderResult<String>;
}
