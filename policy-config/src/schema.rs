//! Strongly typed configuration schemas.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use policy_loader::{Encoding, HttpConfig, SchemaSource};
use policy_normalizer::NormalizerOptions;
use policy_session::ExportMode;
use serde::{Deserialize, Serialize};

/// Top-level editor configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Where the schema comes from.
    pub source: SourceConfig,
    /// How the schema is parsed and grouped.
    pub normalizer: NormalizerOptions,
    /// What the export looks like.
    pub export: ExportConfig,
}

/// `[source]` table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Local path or `http(s)://` URL of the schema.
    pub location: Option<String>,
    /// Payload encoding.
    pub encoding: Encoding,
    /// Optional HTTP timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// `[export]` table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Full dump or touched-only document.
    pub mode: ExportMode,
    /// Output file name; defaults per mode.
    pub file_name: Option<String>,
}

impl EditorConfig {
    /// Overrides the schema location, e.g. from a command-line argument.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.source.location = Some(location.into());
        self
    }

    /// Builds the schema source descriptor.
    ///
    /// # Errors
    ///
    /// Fails when no location is configured or the URL is invalid.
    pub fn source(&self) -> Result<SchemaSource> {
        let Some(location) = self.source.location.as_deref() else {
            bail!("no schema location configured; set `source.location`");
        };
        let source = location
            .parse::<SchemaSource>()
            .with_context(|| format!("invalid schema location `{location}`"))?;
        Ok(source.with_encoding(self.source.encoding))
    }

    /// HTTP transport settings.
    #[must_use]
    pub fn http_config(&self) -> HttpConfig {
        match self.source.timeout_secs {
            Some(secs) => HttpConfig::new().with_timeout(Duration::from_secs(secs)),
            None => HttpConfig::new(),
        }
    }

    /// Normalizer settings.
    #[must_use]
    pub fn normalizer_options(&self) -> &NormalizerOptions {
        &self.normalizer
    }

    /// Export shape.
    #[must_use]
    pub const fn export_mode(&self) -> ExportMode {
        self.export.mode
    }

    /// Export file name, falling back to the mode's default.
    #[must_use]
    pub fn export_file_name(&self) -> &str {
        self.export
            .file_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(self.export.mode.default_file_name())
    }
}

#[cfg(test)]
mod tests {
    use policy_loader::SourceLocation;

    use super::*;

    #[test]
    fn export_file_name_follows_mode() {
        let mut config = EditorConfig::default();
        assert_eq!(config.export_file_name(), "policy.json");

        config.export.mode = ExportMode::TouchedOnly;
        assert_eq!(config.export_file_name(), "policies.json");

        config.export.file_name = Some("chrome_policy.json".into());
        assert_eq!(config.export_file_name(), "chrome_policy.json");
    }

    #[test]
    fn source_requires_location() {
        assert!(EditorConfig::default().source().is_err());

        let config = EditorConfig::default().with_location("https://example.org/p.b64");
        let source = config.source().unwrap();
        assert!(matches!(source.location(), SourceLocation::Url(_)));
    }

    #[test]
    fn timeout_maps_to_http_config() {
        let mut config = EditorConfig::default();
        assert_eq!(config.http_config().timeout(), None);
        config.source.timeout_secs = Some(10);
        assert_eq!(config.http_config().timeout(), Some(Duration::from_secs(10)));
    }
}
