//! Tests for rowgraph-model types.

use proptest::prelude::*;

use rowgraph_model::{
    MapperConfig, ModelError, Operator, RepresentationId, RepresentationKind, column_index,
    column_label,
};

const CONFIG: &str = r##"{
  "name": "people",
  "separator": ";",
  "has_header": true,
  "skip_line_char": "#",
  "representations": [
    {
      "id": "person-a",
      "type": "entity",
      "target": {
        "entity_type": "Person",
        "column_based": { "column_reference": "C", "operator": "eq", "value": "Person" }
      },
      "attributes": [
        { "key": "name", "column": { "column_name": "A" } },
        { "key": "aliases", "column": { "column_name": "B", "configuration": { "separator": "|" } } },
        { "key": "description", "default_values": [] }
      ]
    },
    {
      "id": "knows",
      "type": "relationship",
      "target": { "entity_type": "knows" },
      "attributes": [
        { "key": "from", "based_on": { "representations": ["person-a"] } },
        { "key": "to", "based_on": { "representations": ["person-b"] } }
      ]
    }
  ]
}"##;

#[test]
fn mapper_config_parses_wire_format() {
    let config = MapperConfig::from_json(CONFIG).expect("parse config");
    assert_eq!(config.separator_byte().unwrap(), b';');
    assert_eq!(config.skip_line_byte().unwrap(), Some(b'#'));
    assert!(config.has_header);
    assert_eq!(config.representations.len(), 2);

    let person = &config.representations[0];
    assert_eq!(person.kind, RepresentationKind::Entity);
    assert_eq!(person.target_type(), Some("Person"));
    let predicate = person.target.column_based.as_ref().unwrap();
    assert_eq!(predicate.operator, Operator::Eq);
    assert_eq!(person.attributes[0].column_name(), Some("A"));
    assert_eq!(
        person.attributes[1]
            .column_configuration()
            .and_then(|c| c.separator.as_deref()),
        Some("|")
    );
    assert!(person.attributes[2].defaults().is_none());

    let knows = &config.representations[1];
    assert_eq!(knows.based_on_count(), 2);
    let refs: Vec<&str> = knows.referenced_ids().map(RepresentationId::as_str).collect();
    assert_eq!(refs, vec!["person-a", "person-b"]);
}

#[test]
fn representations_may_be_embedded_as_string() {
    let inner = serde_json::json!([
        { "id": "r1", "type": "entity", "target": { "entity_type": "Person" }, "attributes": [] }
    ]);
    let doc = serde_json::json!({ "name": "stored", "representations": inner.to_string() });
    let config = MapperConfig::from_json(&doc.to_string()).expect("parse embedded");
    assert_eq!(config.representations.len(), 1);
    assert_eq!(config.separator, ",");
    assert!(!config.has_header);
}

#[test]
fn blank_representation_id_is_rejected() {
    let doc = r#"{ "representations": [ { "id": " ", "type": "entity" } ] }"#;
    assert!(matches!(MapperConfig::from_json(doc), Err(ModelError::Json(_))));
}

#[test]
fn invalid_separator_is_reported() {
    let config = MapperConfig {
        separator: "::".to_string(),
        ..MapperConfig::from_json("{}").unwrap()
    };
    assert!(matches!(
        config.separator_byte(),
        Err(ModelError::InvalidSeparator(_))
    ));
}

#[test]
fn labels_fall_back_to_kind_when_type_unset() {
    let doc = r#"{ "representations": [
        { "id": "a", "type": "relationship", "target": { "entity_type": "" } },
        { "id": "b", "type": "entity", "target": { "entity_type": "Person" } }
    ] }"#;
    let config = MapperConfig::from_json(doc).unwrap();
    assert_eq!(
        config.representations[0].label(0),
        "#1 New relationship representation"
    );
    assert_eq!(config.representations[1].label(1), "#2 Person");
}

#[test]
fn predicate_compares_raw_cell() {
    let doc = r#"{ "representations": [
        { "id": "a", "type": "entity", "target": { "entity_type": "Person",
          "column_based": { "column_reference": "C", "operator": "neq", "value": "Person" } } }
    ] }"#;
    let config = MapperConfig::from_json(doc).unwrap();
    let predicate = config.representations[0]
        .target
        .column_based
        .clone()
        .unwrap();
    let record = vec!["Alice".to_string(), "Bob".to_string(), "Org".to_string()];
    assert!(predicate.holds(&record).unwrap());
    let record = vec!["Alice".to_string(), "Bob".to_string(), "Person".to_string()];
    assert!(!predicate.holds(&record).unwrap());
}

#[test]
fn sanitized_drops_unsourced_attributes() {
    let config = MapperConfig::from_json(CONFIG).unwrap().sanitized();
    let keys: Vec<&str> = config.representations[0]
        .attributes
        .iter()
        .map(|attr| attr.key.as_str())
        .collect();
    assert_eq!(keys, vec!["name", "aliases"]);
}

proptest! {
    #[test]
    fn column_label_round_trips(n in 0usize..10_000_000) {
        prop_assert_eq!(column_index(&column_label(n)).unwrap(), n);
    }

    #[test]
    fn column_label_round_trips_near_max(offset in 0usize..1000) {
        let n = usize::MAX - offset;
        prop_assert_eq!(column_index(&column_label(n)).unwrap(), n);
    }

    #[test]
    fn column_labels_are_uppercase(n in 0usize..1_000_000) {
        let label = column_label(n);
        prop_assert!(!label.is_empty());
        prop_assert!(label.bytes().all(|b| b.is_ascii_uppercase()));
    }
}
