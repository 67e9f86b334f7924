//! Best-effort rewrite of Python-literal text into strict JSON.
//!
//! Templates exported with Python's `repr` use single-quoted strings,
//! capitalised `True`/`False`/`None` and triple-quoted multi-line strings.
//! [`to_strict_json`] rewrites these with four global substitutions applied in
//! a fixed order:
//!
//! 1. every `'` becomes `"`;
//! 2. the whole words `True`, `False`, `None` become `true`, `false`, `null`;
//! 3. `"""…"""` literals collapse into a single-line `"…"` string;
//! 4. literal two-character `\n` escapes are removed.
//!
//! The rewrite is unsound: an apostrophe inside a string payload turns into a
//! stray quote. Nothing here tries to repair that. The caller parses the
//! result as strict JSON and reports a parse error when it is not.

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn literal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b(True|False|None)\b").expect("static pattern"))
}

fn triple_quote_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"(?s)"""(.*?)""""#).expect("static pattern"))
}

fn line_break_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\r?\n").expect("static pattern"))
}

/// Rewrites pseudo-JSON text into (hopefully) strict JSON.
///
/// Text that is already strict JSON and contains none of the rewritten
/// constructs comes back unchanged.
#[must_use]
pub fn to_strict_json(text: &str) -> String {
    let quoted = text.replace('\'', "\"");

    let literals = literal_pattern().replace_all(&quoted, |caps: &Captures<'_>| {
        match &caps[1] {
            "True" => "true",
            "False" => "false",
            _ => "null",
        }
    });

    let collapsed = triple_quote_pattern().replace_all(&literals, |caps: &Captures<'_>| {
        format!("\"{}\"", line_break_pattern().replace_all(&caps[1], " "))
    });

    collapsed.replace("\\n", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_python_literals() {
        let text = "[{'name': 'Foo', 'enabled': True, 'other': False, 'value': None}]";
        assert_eq!(
            to_strict_json(text),
            r#"[{"name": "Foo", "enabled": true, "other": false, "value": null}]"#
        );
    }

    #[test]
    fn literal_replacement_is_whole_word_and_case_sensitive() {
        let text = r#"{"a": "TrueType", "b": "NoneSuch", "c": "true", "d": True}"#;
        assert_eq!(
            to_strict_json(text),
            r#"{"a": "TrueType", "b": "NoneSuch", "c": "true", "d": true}"#
        );
    }

    #[test]
    fn collapses_triple_quoted_strings() {
        let text = "{'desc': '''Line one\nline two''', 'caption': \"\"\"Short\"\"\"}";
        assert_eq!(
            to_strict_json(text),
            r#"{"desc": "Line one line two", "caption": "Short"}"#
        );
    }

    #[test]
    fn strips_literal_newline_escapes() {
        let text = r#"{"desc": "first\nsecond"}"#;
        assert_eq!(to_strict_json(text), r#"{"desc": "firstsecond"}"#);
    }

    #[test]
    fn idempotent_on_strict_json() {
        let text = r#"[{"policies": [{"name": "Foo", "type": "bool", "example_value": true}]}]"#;
        assert_eq!(to_strict_json(text), text);
        assert_eq!(to_strict_json(&to_strict_json(text)), text);
    }

    #[test]
    fn apostrophes_break_the_output() {
        let text = "[{'desc': 'Don't do this'}]";
        let rewritten = to_strict_json(text);
        assert!(serde_json::from_str::<serde_json::Value>(&rewritten).is_err());
    }
}
