//! Field extraction for a single policy object.

use policy_primitives::{PolicyDefinition, ValueType};
use serde_json::{Map, Value};

use crate::coerce::coerce_default;
use crate::shape::value_kind;

/// Builds a definition from one policy object.
///
/// `fallback_key` is the mapping key when the object came from a
/// `policies` mapping; it is only used when the object has no `name`.
/// On failure returns the reason the entry should be skipped.
pub(crate) fn extract_policy(
    object: &Map<String, Value>,
    fallback_key: Option<&str>,
) -> Result<PolicyDefinition, String> {
    let key = match object.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => name.as_str(),
        Some(Value::String(_)) => return Err("policy name is empty".to_owned()),
        Some(Value::Null) | None => fallback_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| "policy has no name".to_owned())?,
        Some(other) => {
            return Err(format!(
                "policy name must be text, found {}",
                value_kind(other)
            ));
        }
    };

    let value_type = match object.get("type") {
        None | Some(Value::Null) => ValueType::String,
        Some(Value::String(tag)) => ValueType::from_tag(tag),
        Some(_) => ValueType::Unknown,
    };

    let example = object
        .get("example_value")
        .filter(|value| !value.is_null())
        .or_else(|| object.get("default"));

    PolicyDefinition::new(key, value_type)
        .map(|definition| {
            definition
                .with_caption(text_field(object, &["caption"]))
                .with_description(text_field(object, &["desc", "description"]))
        })
        .and_then(|definition| {
            definition.with_default_value(coerce_default(value_type, example))
        })
        .map_err(|err| err.to_string())
}

fn text_field(object: &Map<String, Value>, fields: &[&str]) -> String {
    fields
        .iter()
        .find_map(|field| object.get(*field).and_then(Value::as_str))
        .unwrap_or_default()
        .to_owned()
}
