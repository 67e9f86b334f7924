//! Parsing of user-entered text into typed policy values.

use policy_normalizer::coerce::split_list;
use policy_primitives::{PolicyValue, ValueType};

/// Parses text typed into an editor field for a policy of `value_type`.
///
/// Blank input clears scalar numeric and boolean fields to `null`; text kinds
/// keep the empty string. Lists are comma-separated.
pub(crate) fn parse_input(value_type: ValueType, text: &str) -> Result<PolicyValue, String> {
    let trimmed = text.trim();
    match value_type {
        ValueType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "" => Ok(PolicyValue::Null),
            "true" | "1" | "on" | "yes" => Ok(PolicyValue::Bool(true)),
            "false" | "0" | "off" | "no" => Ok(PolicyValue::Bool(false)),
            _ => Err(format!("`{trimmed}` is not a boolean")),
        },
        ValueType::Integer | ValueType::IntegerEnum => {
            if trimmed.is_empty() {
                return Ok(PolicyValue::Null);
            }
            trimmed
                .parse::<i64>()
                .map(PolicyValue::Integer)
                .map_err(|err| format!("`{trimmed}` is not an integer: {err}"))
        }
        ValueType::ListOfString => Ok(PolicyValue::List(split_list(text))),
        ValueType::String | ValueType::StringEnum | ValueType::Unknown => {
            Ok(PolicyValue::Text(text.to_owned()))
        }
    }
}
