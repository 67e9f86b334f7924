//! Configuration management for the policy editor.
//!
//! Settings live in a TOML file with three optional tables, `[source]`,
//! `[normalizer]` and `[export]`. Every field has a default, so an empty file
//! is a valid configuration.

#![warn(missing_docs, clippy::pedantic)]

pub mod loader;
pub mod schema;

pub use loader::{load, load_or_default, parse};
pub use schema::{EditorConfig, ExportConfig, SourceConfig};
