use std::fs;

use rowgraph_cli::inputs::{load_identities, load_mapper, load_schema, read_checked_records};
use rowgraph_cli::types::Outcome;
use rowgraph_model::ConfigErrorKind;
use rowgraph_schema::{DefaultValueProvider, IdentityLookup};

const SCHEMA: &str = r#"
[[entities]]
name = "Person"
attributes = [
  { name = "name", type = "string", mandatory = "external" },
  { name = "description", type = "string", mandatory = "customizable" },
]

[[settings]]
target_type = "Person"
attributes = [
  { name = "description", default_values = ["from schema"] },
]
"#;

const SETTINGS: &str = r#"
[[settings]]
target_type = "Person"
attributes = [
  { name = "description", default_values = ["from settings"], mandatory = true },
]
"#;

#[tokio::test]
async fn settings_file_replaces_schema_settings() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("schema.toml");
    let settings_path = dir.path().join("settings.toml");
    fs::write(&schema_path, SCHEMA).unwrap();
    fs::write(&settings_path, SETTINGS).unwrap();

    let (schema, defaults) = load_schema(&schema_path, None).unwrap();
    assert!(schema.is_entity_type("Person"));
    let own = defaults.type_settings("Person").await.unwrap();
    assert_eq!(own.default_values("description"), Some(&["from schema".to_string()][..]));

    let (_, merged) = load_schema(&schema_path, Some(&settings_path)).unwrap();
    let settings = merged.type_settings("Person").await.unwrap();
    assert_eq!(settings.default_values("description"), Some(&["from settings".to_string()][..]));
    assert!(settings.is_mandatory("description"));
}

#[test]
fn mapper_errors_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ nope").unwrap();
    let error = load_mapper(&path).unwrap_err();
    assert!(format!("{error:#}").contains("broken.json"));

    let missing = dir.path().join("missing.json");
    assert!(load_mapper(&missing).is_err());
}

#[tokio::test]
async fn identities_default_to_an_empty_store() {
    let empty = load_identities(None).unwrap();
    let found = empty.find_by_ids(&["anything".to_string()]).await.unwrap();
    assert!(found.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("identities.json");
    fs::write(
        &path,
        r#"[{ "id": "m1", "standard_id": "marking-definition--0000", "entity_type": "Marking" }]"#,
    )
    .unwrap();
    let store = load_identities(Some(&path)).unwrap();
    let found = store.find_by_ids(&["m1".to_string()]).await.unwrap();
    assert_eq!(found["m1"].entity_type, "Marking");
}

fn people_mapper(separator: &str) -> rowgraph_model::MapperConfig {
    let doc = serde_json::json!({ "separator": separator, "has_header": true, "representations": [
        { "id": "a", "type": "entity", "target": { "entity_type": "Person" },
          "attributes": [ { "key": "name", "column": { "column_name": "A" } } ] }
    ] });
    rowgraph_model::MapperConfig::from_json(&doc.to_string()).unwrap()
}

#[tokio::test]
async fn bad_separator_is_reported_before_the_input_is_opened() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("schema.toml");
    fs::write(&schema_path, SCHEMA).unwrap();
    let (schema, defaults) = load_schema(&schema_path, None).unwrap();
    let missing = dir.path().join("missing.csv");

    let outcome = read_checked_records(&people_mapper("::"), &schema, &defaults, &missing)
        .await
        .unwrap();
    let Outcome::Rejected(report) = outcome else {
        panic!("expected the configuration to be rejected");
    };
    assert!(report.has(ConfigErrorKind::InvalidSeparator));

    let input = dir.path().join("people.csv");
    fs::write(&input, "A;B\nAlice;x\nBob;y\n").unwrap();
    let outcome = read_checked_records(&people_mapper(";"), &schema, &defaults, &input)
        .await
        .unwrap();
    let Outcome::Completed(records) = outcome else {
        panic!("expected records");
    };
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].cells, vec!["Alice", "x"]);
}
