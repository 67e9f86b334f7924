//! Source descriptors: where a schema lives and how its payload is encoded.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

use hyper::Uri;
use serde::{Deserialize, Serialize};

use crate::traits::{LoaderError, LoaderResult};

/// Transport encoding of the payload.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Payload is the schema text itself.
    #[default]
    Plain,
    /// Payload is base64 text wrapping the schema.
    Base64,
}

/// Location of a schema.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SourceLocation {
    /// Local file path, absolute or relative to the working directory.
    Path(PathBuf),
    /// Remote `http://` or `https://` URL.
    Url(Uri),
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => Display::fmt(&path.display(), f),
            Self::Url(uri) => Display::fmt(uri, f),
        }
    }
}

/// Describes a schema to load.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SchemaSource {
    location: SourceLocation,
    encoding: Encoding,
}

impl SchemaSource {
    /// Creates a plain-encoded source for a local file.
    #[must_use]
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self {
            location: SourceLocation::Path(path.into()),
            encoding: Encoding::Plain,
        }
    }

    /// Creates a plain-encoded source for a remote URL.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Configuration`] if the URL does not parse or its
    /// scheme is not `http`/`https`.
    pub fn url(url: impl AsRef<str>) -> LoaderResult<Self> {
        let uri = parse_url(url.as_ref())?;
        Ok(Self {
            location: SourceLocation::Url(uri),
            encoding: Encoding::Plain,
        })
    }

    /// Sets the payload encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Returns the location.
    #[must_use]
    pub const fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Returns the payload encoding.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }
}

impl Display for SchemaSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.location, f)
    }
}

impl FromStr for SchemaSource {
    type Err = LoaderError;

    /// Strings starting with `http://` or `https://` are URLs; anything else
    /// is a path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(LoaderError::configuration("schema location cannot be empty"));
        }
        if is_remote(trimmed) {
            Self::url(trimmed)
        } else {
            Ok(Self::path(trimmed))
        }
    }
}

fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn parse_url(input: &str) -> LoaderResult<Uri> {
    let trimmed = input.trim();
    if !is_remote(trimmed) {
        return Err(LoaderError::configuration(
            "schema URL must start with http:// or https://",
        ));
    }
    trimmed
        .parse::<Uri>()
        .map_err(|err| LoaderError::configuration(format!("invalid schema URL: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_on_scheme() {
        let remote: SchemaSource = "https://example.org/policy_templates.json".parse().unwrap();
        assert!(matches!(remote.location(), SourceLocation::Url(_)));

        let local: SchemaSource = "templates/policy.json".parse().unwrap();
        assert_eq!(
            local.location(),
            &SourceLocation::Path(PathBuf::from("templates/policy.json"))
        );
        assert_eq!(local.encoding(), Encoding::Plain);
    }

    #[test]
    fn rejects_url_without_scheme() {
        let err = SchemaSource::url("example.org/policy.json").expect_err("missing scheme");
        assert!(matches!(err, LoaderError::Configuration { .. }));
    }

    #[test]
    fn rejects_empty_location() {
        assert!("   ".parse::<SchemaSource>().is_err());
    }

    #[test]
    fn encoding_is_configurable() {
        let source = SchemaSource::path("p.b64").with_encoding(Encoding::Base64);
        assert_eq!(source.encoding(), Encoding::Base64);
        assert_eq!(source.to_string(), "p.b64");
    }
}
