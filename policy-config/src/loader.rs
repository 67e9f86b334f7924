//! Configuration loading from TOML files.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::schema::EditorConfig;

/// Parses configuration from a TOML string.
///
/// # Errors
///
/// Fails when the text is not valid TOML or contains unknown fields.
pub fn parse(toml_content: &str) -> Result<EditorConfig> {
    toml::from_str(toml_content).context("invalid editor configuration TOML")
}

/// Loads configuration from a TOML file.
///
/// # Errors
///
/// Fails when the file cannot be read or does not parse.
pub fn load(path: impl AsRef<Path>) -> Result<EditorConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config =
        parse(&content).with_context(|| format!("failed to parse config file {}", path.display()))?;
    debug!(path = %path.display(), "editor configuration loaded");
    Ok(config)
}

/// Loads `path` when it exists, otherwise returns the defaults.
///
/// # Errors
///
/// Fails only when the file exists but cannot be read or parsed.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<EditorConfig> {
    let path = path.as_ref();
    if path.exists() {
        load(path)
    } else {
        debug!(path = %path.display(), "no config file, using defaults");
        Ok(EditorConfig::default())
    }
}
