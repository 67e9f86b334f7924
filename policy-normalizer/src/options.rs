//! Normalizer options.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Group label for policies found outside any group or category.
pub const DEFAULT_GROUP: &str = "General";

/// Top-level object fields probed, in order, for the category sequence.
pub const DEFAULT_CONTAINER_FIELDS: [&str; 3] = ["templates", "policy_definitions", "categories"];

/// How the schema text should be parsed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaFormat {
    /// Strict JSON first, then the pseudo-JSON rewrite if that fails.
    #[default]
    Auto,
    /// Strict JSON only.
    Json,
    /// Always apply the pseudo-JSON rewrite before parsing.
    PseudoJson,
}

/// Format a schema was actually parsed as.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectedFormat {
    /// Parsed as strict JSON.
    Json,
    /// Parsed after the pseudo-JSON rewrite.
    PseudoJson,
}

impl Display for DetectedFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "JSON",
            Self::PseudoJson => "pseudo-JSON",
        })
    }
}

/// Options controlling parsing and shape dispatch.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizerOptions {
    format: SchemaFormat,
    default_group: String,
    container_fields: Vec<String>,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            format: SchemaFormat::Auto,
            default_group: DEFAULT_GROUP.to_owned(),
            container_fields: DEFAULT_CONTAINER_FIELDS
                .iter()
                .map(|&field| field.to_owned())
                .collect(),
        }
    }
}

impl NormalizerOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the parse format.
    #[must_use]
    pub fn with_format(mut self, format: SchemaFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the label used for ungrouped policies. Blank labels are ignored.
    #[must_use]
    pub fn with_default_group(mut self, group: impl Into<String>) -> Self {
        let group = group.into();
        if !group.trim().is_empty() {
            self.default_group = group;
        }
        self
    }

    /// Replaces the container fields probed on a top-level object.
    #[must_use]
    pub fn with_container_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.container_fields = fields
            .into_iter()
            .map(Into::into)
            .filter(|field: &String| !field.trim().is_empty())
            .collect();
        self
    }

    /// Returns the parse format.
    #[must_use]
    pub const fn format(&self) -> SchemaFormat {
        self.format
    }

    /// Returns the label used for ungrouped policies.
    #[must_use]
    pub fn default_group(&self) -> &str {
        &self.default_group
    }

    /// Returns the container fields in probe order.
    #[must_use]
    pub fn container_fields(&self) -> &[String] {
        &self.container_fields
    }
}
