//! Canonical data model shared by the policy loader, normalizer and editor session.

#![warn(missing_docs, clippy::pedantic)]

mod definition;
mod error;
mod set;
mod value;

/// A single named, typed policy and its builder-style setters.
pub use definition::PolicyDefinition;
/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Ordered policy collections.
pub use set::{PolicySet, PolicyValues};
/// Closed value kinds and the tagged value representation.
pub use value::{PolicyValue, ValueType};
