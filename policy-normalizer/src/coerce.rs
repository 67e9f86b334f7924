//! Coercion of template example values into type-consistent defaults.

use policy_primitives::{PolicyValue, ValueType};
use serde_json::Value;

/// Coerces an example value from the template into a default for `value_type`.
///
/// A missing or `null` source yields the unset value: `null` for scalar
/// kinds, an empty list for list-of-string.
#[must_use]
pub fn coerce_default(value_type: ValueType, source: Option<&Value>) -> PolicyValue {
    let Some(source) = source.filter(|value| !value.is_null()) else {
        return value_type.unset_value();
    };

    match value_type {
        ValueType::Boolean => source.as_bool().map_or(PolicyValue::Null, PolicyValue::Bool),
        ValueType::Integer | ValueType::IntegerEnum => {
            integer(source).map_or(PolicyValue::Null, PolicyValue::Integer)
        }
        ValueType::String | ValueType::StringEnum => {
            scalar_text(source).map_or(PolicyValue::Null, PolicyValue::Text)
        }
        ValueType::Unknown => scalar_text(source)
            .or_else(|| serde_json::to_string(source).ok())
            .map_or(PolicyValue::Null, PolicyValue::Text),
        ValueType::ListOfString => PolicyValue::List(string_list(source)),
    }
}

/// Splits comma-separated text into trimmed, non-empty items.
#[must_use]
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

fn integer(source: &Value) -> Option<i64> {
    match source {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().and_then(|value| i64::try_from(value).ok()))
            .or_else(|| number.as_f64().and_then(truncate)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

/// Truncates toward zero; non-finite or out-of-range values have no integer.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn truncate(value: f64) -> Option<i64> {
    (value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64)
        .then(|| value.trunc() as i64)
}

fn scalar_text(source: &Value) -> Option<String> {
    match source {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn string_list(source: &Value) -> Vec<String> {
    match source {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        Value::String(text) => split_list(text),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_example_is_unset() {
        assert_eq!(coerce_default(ValueType::Boolean, None), PolicyValue::Null);
        assert_eq!(
            coerce_default(ValueType::Integer, Some(&Value::Null)),
            PolicyValue::Null
        );
        assert_eq!(
            coerce_default(ValueType::ListOfString, None),
            PolicyValue::List(Vec::new())
        );
    }

    #[test]
    fn booleans_must_already_be_booleans() {
        assert_eq!(
            coerce_default(ValueType::Boolean, Some(&json!(true))),
            PolicyValue::Bool(true)
        );
        assert_eq!(
            coerce_default(ValueType::Boolean, Some(&json!("true"))),
            PolicyValue::Null
        );
    }

    #[test]
    fn integers_accept_numeric_text() {
        assert_eq!(
            coerce_default(ValueType::Integer, Some(&json!(42))),
            PolicyValue::Integer(42)
        );
        assert_eq!(
            coerce_default(ValueType::IntegerEnum, Some(&json!(" 7 "))),
            PolicyValue::Integer(7)
        );
        assert_eq!(
            coerce_default(ValueType::Integer, Some(&json!(3.9))),
            PolicyValue::Integer(3)
        );
        assert_eq!(
            coerce_default(ValueType::Integer, Some(&json!("3.5"))),
            PolicyValue::Integer(3)
        );
        assert_eq!(
            coerce_default(ValueType::IntegerEnum, Some(&json!(" -2.7 "))),
            PolicyValue::Integer(-2)
        );
        assert_eq!(
            coerce_default(ValueType::Integer, Some(&json!("NaN"))),
            PolicyValue::Null
        );
        assert_eq!(
            coerce_default(ValueType::Integer, Some(&json!("seven"))),
            PolicyValue::Null
        );
        assert_eq!(
            coerce_default(ValueType::Integer, Some(&json!(true))),
            PolicyValue::Null
        );
    }

    #[test]
    fn strings_stringify_scalars() {
        assert_eq!(
            coerce_default(ValueType::String, Some(&json!("abc"))),
            PolicyValue::Text("abc".into())
        );
        assert_eq!(
            coerce_default(ValueType::StringEnum, Some(&json!(5))),
            PolicyValue::Text("5".into())
        );
        assert_eq!(
            coerce_default(ValueType::String, Some(&json!(["a"]))),
            PolicyValue::Null
        );
    }

    #[test]
    fn unknown_keeps_compound_values_as_text() {
        assert_eq!(
            coerce_default(ValueType::Unknown, Some(&json!({"a": 1}))),
            PolicyValue::Text(r#"{"a":1}"#.into())
        );
    }

    #[test]
    fn comma_separated_lists_are_trimmed() {
        assert_eq!(
            coerce_default(ValueType::ListOfString, Some(&json!("a, b , c"))),
            PolicyValue::List(vec!["a".into(), "b".into(), "c".into()])
        );
        assert_eq!(
            coerce_default(ValueType::ListOfString, Some(&json!(["x", 1, null]))),
            PolicyValue::List(vec!["x".into(), "1".into()])
        );
        assert_eq!(
            coerce_default(ValueType::ListOfString, Some(&json!(false))),
            PolicyValue::List(Vec::new())
        );
        assert!(split_list(" , ").is_empty());
    }
}
