//! Canonical description of one configurable policy.

use serde::{Deserialize, Serialize};

use crate::{Error, PolicyValue, Result, ValueType};

/// A single named, typed configuration option exposed for editing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PolicyDefinition {
    key: String,
    value_type: ValueType,
    #[serde(default)]
    caption: String,
    #[serde(default)]
    description: String,
    default_value: PolicyValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_group: Option<String>,
}

impl PolicyDefinition {
    /// Creates a definition with the unset default for `value_type`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPolicyKey`] when the key is empty or only whitespace.
    pub fn new(key: impl Into<String>, value_type: ValueType) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(Error::InvalidPolicyKey {
                key,
                reason: "policy key cannot be empty".into(),
            });
        }

        Ok(Self {
            key,
            value_type,
            caption: String::new(),
            description: String::new(),
            default_value: value_type.unset_value(),
            source_group: None,
        })
    }

    /// Sets the short human label.
    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Sets the long description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the originating group label.
    #[must_use]
    pub fn with_source_group(mut self, group: impl Into<String>) -> Self {
        self.source_group = Some(group.into());
        self
    }

    /// Sets the default value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when the value is inconsistent with the
    /// definition's value type.
    pub fn with_default_value(mut self, value: PolicyValue) -> Result<Self> {
        self.check(&value)?;
        self.default_value = value;
        Ok(self)
    }

    /// Verifies that `value` may be assigned to this policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when the value kind does not fit.
    pub fn check(&self, value: &PolicyValue) -> Result<()> {
        if self.value_type.accepts(value) {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                key: self.key.clone(),
                expected: self.value_type,
                found: value.kind(),
            })
        }
    }

    /// Returns the unique policy key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the value kind.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns the caption, empty when the template had none.
    #[must_use]
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Returns the description, empty when the template had none.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the default value.
    #[must_use]
    pub const fn default_value(&self) -> &PolicyValue {
        &self.default_value
    }

    /// Returns the originating group label, if any.
    #[must_use]
    pub fn source_group(&self) -> Option<&str> {
        self.source_group.as_deref()
    }
}
