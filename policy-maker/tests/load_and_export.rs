use std::io::Write;

use policy_maker::config;
use policy_maker::loader::{Encoding, FileLoader, SchemaSource};
use policy_maker::normalizer::DetectedFormat;
use policy_maker::primitives::{PolicyValue, ValueType};
use policy_maker::session::{EditorSession, ExportMode, SessionError};
use serde_json::{Value, json};

const PSEUDO_SCHEMA: &str = r#"[
  {'name': 'Startup', 'caption': 'Startup', 'policies': [
    {'name': 'ShowHomeButton', 'type': 'bool', 'caption': 'Show Home button', 'example_value': True},
    {'name': 'RestoreOnStartup', 'type': 'int-enum', 'example_value': 4, 'desc': """Controls what
happens on startup"""},
    {'name': 'HomepageLocation', 'type': 'string', 'example_value': None}
  ]},
  {'name': 'Security', 'policies': [
    {'name': 'URLBlocklist', 'type': 'list', 'example_value': 'a.com, b.com , c.com'},
    {'type': 'bool', 'caption': 'nameless'}
  ]}
]"#;

fn write_schema(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write schema");
    file
}

#[tokio::test]
async fn pseudo_json_file_round_trip() {
    let file = write_schema(PSEUDO_SCHEMA);
    let mut session = EditorSession::default();

    let outcome = session
        .load(&FileLoader, &SchemaSource::path(file.path()))
        .await
        .expect("load");
    assert_eq!(outcome.format, DetectedFormat::PseudoJson);
    assert_eq!(outcome.policies, 4);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].group, "Security");

    let policies = session.policies().expect("loaded");
    assert_eq!(
        policies.get("RestoreOnStartup").unwrap().description(),
        "Controls what happens on startup"
    );
    assert_eq!(
        policies.get("ShowHomeButton").unwrap().value_type(),
        ValueType::Boolean
    );
    assert_eq!(policies.groups(), ["Startup", "Security"]);
    assert!(policies.keys().eq(session.values().unwrap().keys()));

    let exported: Value =
        serde_json::from_str(&session.export(ExportMode::Full).unwrap()).unwrap();
    assert_eq!(
        exported,
        json!({
            "ShowHomeButton": true,
            "RestoreOnStartup": 4,
            "HomepageLocation": null,
            "URLBlocklist": ["a.com", "b.com", "c.com"]
        })
    );
}

#[tokio::test]
async fn base64_category_schema_with_touched_export() {
    // {"templates": [{"category": "Privacy", "policies": {"MetricsReportingEnabled": {"type": "bool", "example_value": false}}}]}
    let encoded = "eyJ0ZW1wbGF0ZXMiOiBbeyJjYXRlZ29yeSI6ICJQcml2YWN5IiwgInBvbGljaWVzIjog\n\
                   eyJNZXRyaWNzUmVwb3J0aW5nRW5hYmxlZCI6IHsidHlwZSI6ICJib29sIiwgImV4YW1w\n\
                   bGVfdmFsdWUiOiBmYWxzZX19fV19\n";
    let file = write_schema(encoded);
    let mut session = EditorSession::default();
    let source = SchemaSource::path(file.path()).with_encoding(Encoding::Base64);

    session.load(&FileLoader, &source).await.expect("load");
    session
        .set_value("MetricsReportingEnabled", PolicyValue::Bool(true))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(ExportMode::TouchedOnly.default_file_name());
    session
        .write_export(&path, ExportMode::TouchedOnly)
        .await
        .unwrap();

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        written,
        json!({"PolicyObjects": [{"PolicyName": "MetricsReportingEnabled", "PolicyValue": true}]})
    );
}

#[tokio::test]
async fn failed_reload_keeps_previous_state() {
    let good = write_schema(r#"[{"policies":[{"name":"Foo","type":"bool","example_value":true}]}]"#);
    let bad = write_schema(r#"{"unrelated": true}"#);
    let mut session = EditorSession::default();

    session
        .load(&FileLoader, &SchemaSource::path(good.path()))
        .await
        .unwrap();
    let err = session
        .load(&FileLoader, &SchemaSource::path(bad.path()))
        .await
        .expect_err("unrecognised shape");
    assert!(matches!(err, SessionError::Normalize(_)));

    assert_eq!(session.loaded_generation(), Some(1));
    assert_eq!(
        session.values().unwrap().get("Foo"),
        Some(&PolicyValue::Bool(true))
    );
}

#[test]
fn config_drives_source_and_export() {
    let config = config::parse(
        r#"
[source]
location = "templates/policy_templates.txt"

[normalizer]
format = "pseudo-json"

[export]
mode = "touched-only"
"#,
    )
    .unwrap();

    let source = config.source().unwrap();
    assert_eq!(source.to_string(), "templates/policy_templates.txt");
    assert_eq!(config.export_file_name(), "policies.json");

    let mut session = EditorSession::new(config.normalizer_options().clone());
    let ticket = session.begin_load();
    let outcome = session
        .complete_load(ticket, "[{'name': 'Solo', 'type': 'string'}]")
        .unwrap();
    assert_eq!(outcome.format, DetectedFormat::PseudoJson);
}
