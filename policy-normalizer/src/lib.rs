//! Schema normalization: loosely structured template text in, canonical
//! [`PolicySet`] and seeded [`PolicyValues`] out.
//!
//! Normalization is a pure function of the input text. It either yields a
//! complete [`Normalized`] result or a [`NormalizeError`]; there is no partial
//! output. Individual entries that cannot be used are skipped and reported as
//! [`FieldError`]s inside the result.

#![warn(missing_docs, clippy::pedantic)]

pub mod coerce;
pub mod pseudo_json;

mod error;
mod extract;
mod options;
mod shape;

use policy_primitives::{PolicySet, PolicyValues};
use serde_json::Value;
use tracing::{debug, info};

pub use error::{FieldError, NormalizeError, NormalizeResult};
pub use options::{
    DEFAULT_CONTAINER_FIELDS, DEFAULT_GROUP, DetectedFormat, NormalizerOptions, SchemaFormat,
};

/// Result of a successful normalization.
#[derive(Clone, Debug)]
pub struct Normalized {
    /// Canonical policies in first-occurrence order.
    pub set: PolicySet,
    /// Values seeded from every policy's default; keys mirror `set`.
    pub values: PolicyValues,
    /// Entries that were skipped.
    pub warnings: Vec<FieldError>,
    /// Format the text was parsed as.
    pub format: DetectedFormat,
}

/// Turns schema text into a [`Normalized`] policy model.
#[derive(Clone, Debug, Default)]
pub struct Normalizer {
    options: NormalizerOptions,
}

impl Normalizer {
    /// Creates a normalizer with the supplied options.
    #[must_use]
    pub fn new(options: NormalizerOptions) -> Self {
        Self { options }
    }

    /// Returns the configured options.
    #[must_use]
    pub fn options(&self) -> &NormalizerOptions {
        &self.options
    }

    /// Parses and normalizes `text`.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Parse`] when the text is not valid JSON (after
    /// the pseudo-JSON rewrite, when applicable) and [`NormalizeError::Schema`]
    /// when the parsed value matches no recognised shape.
    pub fn normalize(&self, text: &str) -> NormalizeResult<Normalized> {
        let (root, format) = parse(text, self.options.format())?;
        let collected = shape::collect(&root, &self.options)?;
        let values = PolicyValues::seeded_from(&collected.set);

        info!(
            policies = collected.set.len(),
            skipped = collected.warnings.len(),
            %format,
            "schema normalized"
        );

        Ok(Normalized {
            set: collected.set,
            values,
            warnings: collected.warnings,
            format,
        })
    }
}

/// Normalizes `text` with the default options.
///
/// # Errors
///
/// See [`Normalizer::normalize`].
pub fn normalize(text: &str) -> NormalizeResult<Normalized> {
    Normalizer::default().normalize(text)
}

fn parse(text: &str, format: SchemaFormat) -> NormalizeResult<(Value, DetectedFormat)> {
    match format {
        SchemaFormat::Json => parse_as(text, DetectedFormat::Json),
        SchemaFormat::PseudoJson => {
            parse_as(&pseudo_json::to_strict_json(text), DetectedFormat::PseudoJson)
        }
        SchemaFormat::Auto => match serde_json::from_str(text) {
            Ok(root) => Ok((root, DetectedFormat::Json)),
            Err(err) => {
                debug!(%err, "strict JSON parse failed, applying pseudo-JSON rewrite");
                parse_as(&pseudo_json::to_strict_json(text), DetectedFormat::PseudoJson)
            }
        },
    }
}

fn parse_as(text: &str, format: DetectedFormat) -> NormalizeResult<(Value, DetectedFormat)> {
    serde_json::from_str(text)
        .map(|root| (root, format))
        .map_err(|source| NormalizeError::Parse { format, source })
}
