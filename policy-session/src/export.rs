//! Export documents built from the current policy values.

use policy_primitives::{PolicyValue, PolicyValues};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Shape of the exported document.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportMode {
    /// Every policy key mapped directly to its current value.
    #[default]
    Full,
    /// Only edited policies, as `{"PolicyObjects": [{"PolicyName", "PolicyValue"}]}`.
    TouchedOnly,
}

impl ExportMode {
    /// File name used when the configuration does not override it.
    #[must_use]
    pub const fn default_file_name(self) -> &'static str {
        match self {
            Self::Full => "policy.json",
            Self::TouchedOnly => "policies.json",
        }
    }
}

/// Flat `{key: value}` document over every policy, in policy order.
pub(crate) struct FullDocument<'a>(pub(crate) &'a PolicyValues);

impl Serialize for FullDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Touched-only document, in first-edit order.
#[derive(Serialize)]
pub(crate) struct TouchedDocument<'a> {
    #[serde(rename = "PolicyObjects")]
    policy_objects: Vec<TouchedPolicy<'a>>,
}

#[derive(Serialize)]
struct TouchedPolicy<'a> {
    #[serde(rename = "PolicyName")]
    name: &'a str,
    #[serde(rename = "PolicyValue")]
    value: &'a PolicyValue,
}

impl<'a> TouchedDocument<'a> {
    pub(crate) fn new(values: &'a PolicyValues) -> Self {
        Self {
            policy_objects: values
                .touched()
                .map(|(name, value)| TouchedPolicy { name, value })
                .collect(),
        }
    }
}

/// Renders `values` as pretty-printed JSON in the requested shape.
pub(crate) fn render(values: &PolicyValues, mode: ExportMode) -> serde_json::Result<String> {
    match mode {
        ExportMode::Full => serde_json::to_string_pretty(&FullDocument(values)),
        ExportMode::TouchedOnly => serde_json::to_string_pretty(&TouchedDocument::new(values)),
    }
}
