//! Detection of the schema shape and collection of policy entries.
//!
//! Two shapes are recognised:
//!
//! * a top-level sequence of groups (objects carrying `policies`, or typed
//!   `group`) mixed with standalone policy objects;
//! * a top-level object whose container field holds a sequence of categories,
//!   each with `policies` as a sequence or a name-keyed mapping.
//!
//! Standalone policies land in the default group unless a group listed them
//! by name.

use std::collections::HashMap;

use policy_primitives::{PolicyDefinition, PolicySet};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{FieldError, NormalizeError, NormalizeResult};
use crate::extract::extract_policy;
use crate::options::NormalizerOptions;

/// Output of shape collection.
#[derive(Debug)]
pub(crate) struct Collected {
    pub(crate) set: PolicySet,
    pub(crate) warnings: Vec<FieldError>,
}

/// Dispatches on the top-level shape and collects every policy entry.
pub(crate) fn collect(root: &Value, options: &NormalizerOptions) -> NormalizeResult<Collected> {
    let mut collector = Collector::new(options);

    match root {
        Value::Array(items) => {
            debug!(entries = items.len(), "collecting top-level sequence");
            collector.entries(items);
        }
        Value::Object(object) => {
            let Some((field, container)) = options
                .container_fields()
                .iter()
                .find_map(|field| object.get(field.as_str()).map(|value| (field, value)))
            else {
                return Err(NormalizeError::schema(format!(
                    "top-level object has none of the container fields [{}]",
                    options.container_fields().join(", ")
                )));
            };
            let Value::Array(items) = container else {
                return Err(NormalizeError::schema(format!(
                    "container field `{field}` must be a sequence, found {}",
                    value_kind(container)
                )));
            };
            debug!(%field, entries = items.len(), "collecting container field");
            collector.entries(items);
        }
        other => {
            return Err(NormalizeError::schema(format!(
                "top level must be a sequence or an object, found {}",
                value_kind(other)
            )));
        }
    }

    Ok(collector.finish())
}

/// Short name of a JSON value kind, used in diagnostics.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "object",
    }
}

struct Pending {
    definition: PolicyDefinition,
    group: Option<String>,
}

struct Collector<'o> {
    options: &'o NormalizerOptions,
    pending: Vec<Pending>,
    references: HashMap<String, String>,
    warnings: Vec<FieldError>,
}

impl<'o> Collector<'o> {
    fn new(options: &'o NormalizerOptions) -> Self {
        Self {
            options,
            pending: Vec::new(),
            references: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    fn entries(&mut self, items: &[Value]) {
        let options = self.options;
        for (position, item) in items.iter().enumerate() {
            match item {
                Value::Object(object) if is_group(object) => self.group(object, position),
                Value::Object(object) => self.policy(object, None, None, position),
                other => self.skip(
                    options.default_group(),
                    position,
                    format!("expected an object, found {}", value_kind(other)),
                ),
            }
        }
    }

    fn group(&mut self, object: &Map<String, Value>, position: usize) {
        let options = self.options;
        let label = group_label(object)
            .unwrap_or(options.default_group())
            .to_owned();

        match object.get("policies") {
            Some(Value::Array(policies)) => {
                for (index, entry) in policies.iter().enumerate() {
                    match entry {
                        Value::Object(policy) => self.policy(policy, None, Some(&label), index),
                        Value::String(name) => {
                            self.references
                                .entry(name.clone())
                                .or_insert_with(|| label.clone());
                        }
                        other => self.skip(
                            &label,
                            index,
                            format!("expected a policy object, found {}", value_kind(other)),
                        ),
                    }
                }
            }
            Some(Value::Object(policies)) => {
                for (index, (key, entry)) in policies.iter().enumerate() {
                    match entry {
                        Value::Object(policy) => {
                            self.policy(policy, Some(key.as_str()), Some(&label), index);
                        }
                        other => self.skip(
                            &label,
                            index,
                            format!(
                                "expected a policy object for `{key}`, found {}",
                                value_kind(other)
                            ),
                        ),
                    }
                }
            }
            None | Some(Value::Null) => debug!(group = %label, "group lists no policies"),
            Some(other) => self.skip(
                &label,
                position,
                format!(
                    "`policies` must be a sequence or mapping, found {}",
                    value_kind(other)
                ),
            ),
        }
    }

    fn policy(
        &mut self,
        object: &Map<String, Value>,
        fallback_key: Option<&str>,
        group: Option<&str>,
        position: usize,
    ) {
        match extract_policy(object, fallback_key) {
            Ok(definition) => self.pending.push(Pending {
                definition,
                group: group.map(str::to_owned),
            }),
            Err(reason) => {
                let options = self.options;
                let group = group.unwrap_or(options.default_group());
                self.skip(group, position, reason);
            }
        }
    }

    fn skip(&mut self, group: &str, position: usize, reason: String) {
        warn!(group, position, %reason, "skipping policy entry");
        self.warnings.push(FieldError {
            group: group.to_owned(),
            position,
            reason,
        });
    }

    fn finish(self) -> Collected {
        let Self {
            options,
            pending,
            references,
            warnings,
        } = self;

        let mut set = PolicySet::new();
        for Pending { definition, group } in pending {
            let group = group
                .or_else(|| references.get(definition.key()).cloned())
                .unwrap_or_else(|| options.default_group().to_owned());
            if let Some(previous) = set.insert(definition.with_source_group(group)) {
                debug!(key = previous.key(), "duplicate policy key, later definition wins");
            }
        }

        Collected { set, warnings }
    }
}

fn is_group(object: &Map<String, Value>) -> bool {
    object.contains_key("policies")
        || object
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("group"))
}

fn group_label(object: &Map<String, Value>) -> Option<&str> {
    ["caption", "name", "category"]
        .iter()
        .filter_map(|field| object.get(*field).and_then(Value::as_str))
        .find(|label| !label.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use policy_primitives::PolicyValue;
    use serde_json::json;

    use super::*;

    fn collect_default(root: &Value) -> NormalizeResult<Collected> {
        collect(root, &NormalizerOptions::default())
    }

    #[test]
    fn array_of_groups() {
        let root = json!([
            {"caption": "Startup", "policies": [
                {"name": "A", "type": "bool", "example_value": true},
                {"name": "B", "type": "int", "example_value": 3}
            ]},
            {"name": "Network", "policies": [{"name": "C", "type": "string"}]}
        ]);
        let collected = collect_default(&root).unwrap();

        assert_eq!(collected.set.keys().collect::<Vec<_>>(), ["A", "B", "C"]);
        assert_eq!(collected.set.get("A").unwrap().source_group(), Some("Startup"));
        assert_eq!(collected.set.get("C").unwrap().source_group(), Some("Network"));
        assert!(collected.warnings.is_empty());
    }

    #[test]
    fn standalone_policies_use_default_group() {
        let root = json!([
            {"name": "Loose", "type": "bool"},
            {"type": "group", "name": "Empty"}
        ]);
        let collected = collect_default(&root).unwrap();

        assert_eq!(collected.set.len(), 1);
        assert_eq!(collected.set.get("Loose").unwrap().source_group(), Some("General"));
    }

    #[test]
    fn name_references_assign_groups() {
        let root = json!([
            {"type": "group", "name": "Proxy", "caption": "Proxy server", "policies": ["ProxyMode"]},
            {"name": "ProxyMode", "type": "string-enum", "example_value": "direct"},
            {"name": "Other", "type": "bool"}
        ]);
        let collected = collect_default(&root).unwrap();

        assert_eq!(
            collected.set.get("ProxyMode").unwrap().source_group(),
            Some("Proxy server")
        );
        assert_eq!(collected.set.get("Other").unwrap().source_group(), Some("General"));
    }

    #[test]
    fn object_with_container_field() {
        let root = json!({
            "templates": [
                {"category": "Privacy", "policies": {
                    "Telemetry": {"type": "bool", "example_value": false},
                    "Sites": {"name": "BlockedSites", "type": "list", "example_value": "a.com, b.com"}
                }},
                {"caption": "Misc", "policies": [{"name": "Motd"}]}
            ]
        });
        let collected = collect_default(&root).unwrap();

        assert_eq!(
            collected.set.keys().collect::<Vec<_>>(),
            ["Telemetry", "BlockedSites", "Motd"]
        );
        assert_eq!(
            collected.set.get("BlockedSites").unwrap().default_value(),
            &PolicyValue::List(vec!["a.com".into(), "b.com".into()])
        );
        assert_eq!(
            collected.set.get("Telemetry").unwrap().source_group(),
            Some("Privacy")
        );
    }

    #[test]
    fn nameless_entries_are_skipped_with_warnings() {
        let root = json!([{"caption": "G", "policies": [
            {"type": "bool"},
            {"name": "Kept", "type": "bool"},
            42
        ]}]);
        let collected = collect_default(&root).unwrap();

        assert_eq!(collected.set.keys().collect::<Vec<_>>(), ["Kept"]);
        assert_eq!(collected.warnings.len(), 2);
        assert_eq!(collected.warnings[0].group, "G");
        assert_eq!(collected.warnings[0].position, 0);
        assert_eq!(collected.warnings[1].position, 2);
    }

    #[test]
    fn duplicate_keys_keep_first_position_last_value() {
        let root = json!([
            {"policies": [
                {"name": "A", "type": "int", "example_value": 1},
                {"name": "B", "type": "int", "example_value": 2},
                {"name": "A", "type": "int", "example_value": 3}
            ]}
        ]);
        let collected = collect_default(&root).unwrap();

        assert_eq!(collected.set.keys().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(
            collected.set.get("A").unwrap().default_value(),
            &PolicyValue::Integer(3)
        );
    }

    #[test]
    fn unrecognised_shapes_are_schema_errors() {
        for root in [
            json!("text"),
            json!(12),
            json!({"unrelated": []}),
            json!({"templates": {"not": "a sequence"}}),
        ] {
            let err = collect_default(&root).expect_err("unrecognised shape");
            assert!(matches!(err, NormalizeError::Schema { .. }), "{root}");
        }
    }

    #[test]
    fn custom_container_fields() {
        let options = NormalizerOptions::new().with_container_fields(["sections"]);
        let root = json!({"sections": [{"name": "Solo", "type": "bool"}]});
        let collected = collect(&root, &options).unwrap();
        assert!(collected.set.contains_key("Solo"));
    }
}
