//! Value kinds and the tagged value representation used for defaults and edits.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Closed set of value kinds a policy can hold.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    /// `true` / `false`.
    Boolean,
    /// Base-10 signed integer.
    Integer,
    /// Free text.
    String,
    /// Text restricted to an enumeration in the source template.
    StringEnum,
    /// Integer restricted to an enumeration in the source template.
    IntegerEnum,
    /// Ordered sequence of strings.
    #[serde(rename = "list-of-string")]
    ListOfString,
    /// Unrecognised source type; edited as free text.
    Unknown,
}

impl ValueType {
    /// Maps a source type tag onto a value kind.
    ///
    /// Matching ignores ASCII case. Tags outside the table map to
    /// [`ValueType::Unknown`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Self::Boolean,
            "int" | "integer" => Self::Integer,
            "int-enum" => Self::IntegerEnum,
            "string" => Self::String,
            "string-enum" => Self::StringEnum,
            "list" => Self::ListOfString,
            _ => Self::Unknown,
        }
    }

    /// Returns `true` for the list-of-string kind.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::ListOfString)
    }

    /// Returns `true` for integer kinds.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Integer | Self::IntegerEnum)
    }

    /// Default used when the template supplies no example value.
    #[must_use]
    pub fn unset_value(self) -> PolicyValue {
        if self.is_list() {
            PolicyValue::List(Vec::new())
        } else {
            PolicyValue::Null
        }
    }

    /// Returns `true` when `value` is consistent with this kind.
    ///
    /// `Null` is accepted by every scalar kind and never by lists.
    #[must_use]
    pub fn accepts(self, value: &PolicyValue) -> bool {
        match (self, value) {
            (Self::ListOfString, PolicyValue::List(_))
            | (Self::Boolean, PolicyValue::Null | PolicyValue::Bool(_))
            | (Self::Integer | Self::IntegerEnum, PolicyValue::Null | PolicyValue::Integer(_))
            | (
                Self::String | Self::StringEnum | Self::Unknown,
                PolicyValue::Null | PolicyValue::Text(_),
            ) => true,
            _ => false,
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::String => "string",
            Self::StringEnum => "stringEnum",
            Self::IntegerEnum => "integerEnum",
            Self::ListOfString => "list-of-string",
            Self::Unknown => "unknown",
        })
    }
}

/// Current or default value of a policy.
///
/// Serializes to the natural JSON form (`null`, `true`, `42`, `"text"`,
/// `["a", "b"]`).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PolicyValue {
    /// Unset.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// Text value.
    Text(String),
    /// Ordered list of strings.
    List(Vec<String>),
}

impl PolicyValue {
    /// Short name of the value kind, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Text(_) => "text",
            Self::List(_) => "list",
        }
    }

    /// Returns `true` for [`PolicyValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean payload, if any.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text payload, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the list payload, if any.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Converts into a [`serde_json::Value`] for export.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(value) => serde_json::Value::Bool(*value),
            Self::Integer(value) => serde_json::Value::from(*value),
            Self::Text(value) => serde_json::Value::String(value.clone()),
            Self::List(items) => serde_json::Value::from(items.clone()),
        }
    }
}

impl From<bool> for PolicyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PolicyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for PolicyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for PolicyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for PolicyValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_table_is_total() {
        assert_eq!(ValueType::from_tag("bool"), ValueType::Boolean);
        assert_eq!(ValueType::from_tag("Boolean"), ValueType::Boolean);
        assert_eq!(ValueType::from_tag("int"), ValueType::Integer);
        assert_eq!(ValueType::from_tag("int-enum"), ValueType::IntegerEnum);
        assert_eq!(ValueType::from_tag("string"), ValueType::String);
        assert_eq!(ValueType::from_tag("string-enum"), ValueType::StringEnum);
        assert_eq!(ValueType::from_tag("list"), ValueType::ListOfString);
        assert_eq!(ValueType::from_tag("dict"), ValueType::Unknown);
        assert_eq!(ValueType::from_tag(""), ValueType::Unknown);
    }

    #[test]
    fn lists_never_accept_null() {
        assert!(!ValueType::ListOfString.accepts(&PolicyValue::Null));
        assert!(ValueType::Boolean.accepts(&PolicyValue::Null));
        assert!(ValueType::ListOfString.accepts(&PolicyValue::List(Vec::new())));
        assert!(!ValueType::Integer.accepts(&PolicyValue::from("7")));
        assert_eq!(ValueType::ListOfString.unset_value(), PolicyValue::List(Vec::new()));
        assert_eq!(ValueType::IntegerEnum.unset_value(), PolicyValue::Null);
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![
            PolicyValue::Null,
            PolicyValue::from(true),
            PolicyValue::from(3),
            PolicyValue::from("x"),
            PolicyValue::from(vec!["a".to_owned()]),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,true,3,"x",["a"]]"#);
        assert_eq!(ValueType::ListOfString.to_string(), "list-of-string");
        assert_eq!(
            serde_json::to_string(&ValueType::StringEnum).unwrap(),
            r#""stringEnum""#
        );
    }
}
