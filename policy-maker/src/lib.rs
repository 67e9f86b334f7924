//! Policy template editor facade.
//!
//! Bundles the workspace crates behind feature flags: the data model and the
//! normalizer are always available; loading, the editing session,
//! configuration and logging setup can be switched off.

#![warn(missing_docs, clippy::pedantic)]

/// Canonical policy data model.
pub use policy_primitives as primitives;

/// Schema normalization.
pub use policy_normalizer as normalizer;

/// Schema loaders (enabled by `loader` feature).
#[cfg(feature = "loader")]
pub use policy_loader as loader;

/// Editing session and export (enabled by `session` feature).
#[cfg(feature = "session")]
pub use policy_session as session;

/// Editor configuration (enabled by `config` feature).
#[cfg(feature = "config")]
pub use policy_config as config;

/// Logging setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use policy_telemetry as telemetry;
