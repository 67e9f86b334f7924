//! Editing session for policy templates.
//!
//! An [`EditorSession`] owns the currently loaded [`PolicySet`] and its
//! [`PolicyValues`]. Loads are all-or-nothing and last-load-wins: every load
//! takes a [`LoadTicket`], and only the most recently issued ticket may commit.
//! A failed or superseded load leaves the previous schema and edits in place.

#![warn(missing_docs, clippy::pedantic)]

mod edit;
mod error;
mod export;

use std::path::Path;

use policy_loader::{SchemaLoader, SchemaSource};
use policy_normalizer::{DetectedFormat, FieldError, Normalizer, NormalizerOptions};
use policy_primitives::{PolicySet, PolicyValue, PolicyValues};
use tracing::{debug, info, warn};

pub use error::{SessionError, SessionResult};
pub use export::ExportMode;

/// Permission to commit one load; see [`EditorSession::begin_load`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    /// Returns the load generation this ticket stands for.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// Summary of a committed load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Generation that committed.
    pub generation: u64,
    /// Number of policies now loaded.
    pub policies: usize,
    /// Entries that were dropped while normalizing.
    pub skipped: Vec<FieldError>,
    /// Format the schema was parsed as.
    pub format: DetectedFormat,
}

impl LoadOutcome {
    /// Returns `true` when every entry normalized.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[derive(Debug)]
struct LoadedSchema {
    generation: u64,
    set: PolicySet,
    values: PolicyValues,
    warnings: Vec<FieldError>,
}

/// Caller-owned editing session.
#[derive(Debug, Default)]
pub struct EditorSession {
    normalizer: Normalizer,
    issued: u64,
    loaded: Option<LoadedSchema>,
}

impl EditorSession {
    /// Creates an empty session normalizing with `options`.
    #[must_use]
    pub fn new(options: NormalizerOptions) -> Self {
        Self {
            normalizer: Normalizer::new(options),
            issued: 0,
            loaded: None,
        }
    }

    /// Starts a load, invalidating every ticket issued before it.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        debug!(generation = self.issued, "load started");
        LoadTicket {
            generation: self.issued,
        }
    }

    /// Returns `true` when `ticket` is the most recently issued one.
    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.issued
    }

    /// Normalizes `text` and, if `ticket` is still current, replaces the
    /// loaded schema and values in one step.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Superseded`] when a newer load was started, or
    /// [`SessionError::Normalize`] when the text cannot be normalized. In both
    /// cases the previously loaded schema is left untouched.
    pub fn complete_load(&mut self, ticket: LoadTicket, text: &str) -> SessionResult<LoadOutcome> {
        self.ensure_current(ticket)?;

        let normalized = self.normalizer.normalize(text).inspect_err(|err| {
            warn!(generation = ticket.generation, %err, "load aborted, keeping previous schema");
        })?;

        let outcome = LoadOutcome {
            generation: ticket.generation,
            policies: normalized.set.len(),
            skipped: normalized.warnings.clone(),
            format: normalized.format,
        };

        self.loaded = Some(LoadedSchema {
            generation: ticket.generation,
            set: normalized.set,
            values: normalized.values,
            warnings: normalized.warnings,
        });
        info!(
            generation = outcome.generation,
            policies = outcome.policies,
            skipped = outcome.skipped.len(),
            "schema loaded"
        );

        Ok(outcome)
    }

    /// Fetches `source` with `loader` and commits the result.
    ///
    /// The fetch is the only suspension point; normalization runs to
    /// completion afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Load`] when fetching or decoding fails, plus
    /// everything [`EditorSession::complete_load`] can return.
    pub async fn load<L>(&mut self, loader: &L, source: &SchemaSource) -> SessionResult<LoadOutcome>
    where
        L: SchemaLoader + ?Sized,
    {
        let ticket = self.begin_load();
        let text = loader.load(source).await.inspect_err(|err| {
            warn!(generation = ticket.generation, %source, %err, "fetch failed, keeping previous schema");
        })?;
        self.complete_load(ticket, &text)
    }

    /// Returns `true` once a schema has been committed.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Generation of the committed schema, if any.
    #[must_use]
    pub fn loaded_generation(&self) -> Option<u64> {
        self.loaded.as_ref().map(|loaded| loaded.generation)
    }

    /// Returns the loaded policies.
    #[must_use]
    pub fn policies(&self) -> Option<&PolicySet> {
        self.loaded.as_ref().map(|loaded| &loaded.set)
    }

    /// Returns the current values.
    #[must_use]
    pub fn values(&self) -> Option<&PolicyValues> {
        self.loaded.as_ref().map(|loaded| &loaded.values)
    }

    /// Entries skipped by the committed load.
    #[must_use]
    pub fn warnings(&self) -> &[FieldError] {
        self.loaded
            .as_ref()
            .map(|loaded| loaded.warnings.as_slice())
            .unwrap_or_default()
    }

    /// Sets the value of `key`, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotLoaded`] before the first load and
    /// [`SessionError::Policy`] for unknown keys or values that do not fit the
    /// policy's type.
    pub fn set_value(&mut self, key: &str, value: PolicyValue) -> SessionResult<PolicyValue> {
        let loaded = self.loaded.as_mut().ok_or(SessionError::NotLoaded)?;
        let definition = loaded
            .set
            .get(key)
            .ok_or_else(|| policy_primitives::Error::UnknownPolicy { key: key.into() })?;
        definition.check(&value)?;

        debug!(key, value = ?value, "policy value set");
        Ok(loaded.values.assign(key, value)?)
    }

    /// Parses `text` for the type of `key` and sets it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidInput`] when the text does not parse,
    /// plus everything [`EditorSession::set_value`] can return.
    pub fn set_value_from_text(&mut self, key: &str, text: &str) -> SessionResult<PolicyValue> {
        let policies = self.policies().ok_or(SessionError::NotLoaded)?;
        let definition = policies
            .get(key)
            .ok_or_else(|| policy_primitives::Error::UnknownPolicy { key: key.into() })?;
        let value = edit::parse_input(definition.value_type(), text).map_err(|reason| {
            SessionError::InvalidInput {
                key: key.into(),
                reason,
            }
        })?;
        self.set_value(key, value)
    }

    /// Restores the default of `key` and clears its edited mark.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotLoaded`] or [`SessionError::Policy`] for
    /// unknown keys.
    pub fn reset(&mut self, key: &str) -> SessionResult<()> {
        let loaded = self.loaded.as_mut().ok_or(SessionError::NotLoaded)?;
        let default = loaded
            .set
            .get(key)
            .ok_or_else(|| policy_primitives::Error::UnknownPolicy { key: key.into() })?
            .default_value()
            .clone();
        loaded.values.restore(key, default)?;
        Ok(())
    }

    /// Renders the export document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotLoaded`] before the first load or
    /// [`SessionError::Serialize`] if serialization fails.
    pub fn export(&self, mode: ExportMode) -> SessionResult<String> {
        let values = self.values().ok_or(SessionError::NotLoaded)?;
        Ok(export::render(values, mode)?)
    }

    /// Writes the export document to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Io`] when the file cannot be written, plus
    /// everything [`EditorSession::export`] can return.
    pub async fn write_export(&self, path: &Path, mode: ExportMode) -> SessionResult<()> {
        let document = self.export(mode)?;
        tokio::fs::write(path, document)
            .await
            .map_err(|source| SessionError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), ?mode, "policy export written");
        Ok(())
    }

    fn ensure_current(&self, ticket: LoadTicket) -> SessionResult<()> {
        if self.is_current(ticket) {
            return Ok(());
        }
        debug!(
            generation = ticket.generation,
            latest = self.issued,
            "discarding superseded load"
        );
        Err(SessionError::Superseded {
            generation: ticket.generation,
            latest: self.issued,
        })
    }
}
