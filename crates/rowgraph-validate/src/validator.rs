use std::collections::BTreeSet;

use tracing::{Instrument, debug, info_span};

use rowgraph_model::{
    ConfigErrorKind, ConfigIssue, MapperConfig, Representation, RepresentationKind,
    ValidationReport,
};
use rowgraph_schema::{
    DefaultValueProvider, SchemaRegistry, TypeDefinition, TypeKind, TypeSettings,
};

use crate::cycles::find_cycles;

/// Checks a mapper configuration against the schema without reading any record.
///
/// Every problem is collected; an empty report means the configuration may be
/// used for mapping.
pub async fn validate<P: DefaultValueProvider>(
    config: &MapperConfig,
    schema: &SchemaRegistry,
    defaults: &P,
) -> ValidationReport {
    let span = info_span!("validate", mapper = %config.name);
    check_configuration(config, schema, defaults)
        .instrument(span)
        .await
}

async fn check_configuration<P: DefaultValueProvider>(
    config: &MapperConfig,
    schema: &SchemaRegistry,
    defaults: &P,
) -> ValidationReport {
    let mut report = ValidationReport {
        mapper_name: config.name.clone(),
        issues: Vec::new(),
    };

    if config.representations.is_empty() {
        report.issues.push(ConfigIssue::new(
            ConfigErrorKind::EmptyConfiguration,
            format!("Mapper '{}' has no representation", config.name),
        ));
        return report;
    }
    if let Err(error) = config.separator_byte() {
        report
            .issues
            .push(ConfigIssue::new(ConfigErrorKind::InvalidSeparator, error.to_string()));
    }
    if let Err(error) = config.skip_line_byte() {
        report
            .issues
            .push(ConfigIssue::new(ConfigErrorKind::InvalidSkipLineChar, error.to_string()));
    }

    let mut known_ids = BTreeSet::new();
    for (idx, representation) in config.representations.iter().enumerate() {
        if !known_ids.insert(representation.id.as_str()) {
            report.issues.push(
                ConfigIssue::new(
                    ConfigErrorKind::DuplicateRepresentationId,
                    format!("Representation id '{}' is used more than once", representation.id),
                )
                .in_representation(representation.label(idx)),
            );
        }
    }

    for (idx, representation) in config.representations.iter().enumerate() {
        let label = representation.label(idx);
        check_references(representation, &known_ids, &label, &mut report.issues);
        let Some(definition) = target_definition(representation, schema) else {
            let target = representation.target_type().unwrap_or_default();
            report.issues.push(
                ConfigIssue::new(
                    ConfigErrorKind::UnknownTargetType,
                    format!("Unknown {} type '{target}'", representation.kind),
                )
                .in_representation(&label),
            );
            continue;
        };
        let settings = defaults.type_settings(&definition.name).await;

        check_required(
            representation,
            definition,
            schema,
            settings.as_ref(),
            &label,
            &mut report.issues,
        );
        check_attributes(representation, definition, &label, &mut report.issues);
    }

    for cycle in find_cycles(config) {
        let labels: Vec<String> = cycle
            .iter()
            .chain(cycle.first())
            .map(|idx| config.representations[*idx].label(*idx))
            .collect();
        let first = &labels[0];
        report.issues.push(
            ConfigIssue::new(
                ConfigErrorKind::ReferenceCycle,
                format!("Reference cycle found: {}", labels.join(" -> ")),
            )
            .in_representation(first),
        );
    }

    debug!(issues = report.issue_count(), "configuration validated");
    report
}

/// The schema type a representation targets, when it exists with the matching kind.
fn target_definition<'a>(
    representation: &Representation,
    schema: &'a SchemaRegistry,
) -> Option<&'a TypeDefinition> {
    let expected = match representation.kind {
        RepresentationKind::Entity => TypeKind::Entity,
        RepresentationKind::Relationship => TypeKind::Relationship,
    };
    representation
        .target_type()
        .and_then(|name| schema.get(name))
        .filter(|def| def.kind == expected)
}

/// Every required field needs a column, a based-on reference, or a default.
fn check_required(
    representation: &Representation,
    definition: &TypeDefinition,
    schema: &SchemaRegistry,
    settings: Option<&TypeSettings>,
    label: &str,
    issues: &mut Vec<ConfigIssue>,
) {
    for field in schema.required_fields(&definition.name, settings) {
        let name = field.name();
        let mapping = representation.attribute(name);
        let has_source = mapping.is_some_and(|m| {
            m.column_name().is_some() || !m.based_on_ids().is_empty() || m.defaults().is_some()
        });
        let has_setting_default = settings.is_some_and(|s| s.default_values(name).is_some());
        if !has_source && !has_setting_default {
            issues.push(
                ConfigIssue::new(
                    ConfigErrorKind::MissingRequiredValue,
                    "Missing values for required attribute",
                )
                .in_representation(label)
                .on_attribute(name),
            );
        }
    }
}

/// Based-on checks that hold whatever the target type is.
fn check_references(
    representation: &Representation,
    known_ids: &BTreeSet<&str>,
    label: &str,
    issues: &mut Vec<ConfigIssue>,
) {
    for mapping in &representation.attributes {
        let key = mapping.key.as_str();
        let based_on = mapping.based_on_ids();
        if based_on.contains(&representation.id) {
            issues.push(
                ConfigIssue::new(
                    ConfigErrorKind::SelfReference,
                    "Can't reference the representation itself",
                )
                .in_representation(label)
                .on_attribute(key),
            );
        }
        for id in based_on {
            if !known_ids.contains(id.as_str()) {
                issues.push(
                    ConfigIssue::new(
                        ConfigErrorKind::DanglingReference,
                        format!("Unknown representation '{id}'"),
                    )
                    .in_representation(label)
                    .on_attribute(key),
                );
            }
        }
    }
}

fn check_attributes(
    representation: &Representation,
    definition: &TypeDefinition,
    label: &str,
    issues: &mut Vec<ConfigIssue>,
) {
    for mapping in &representation.attributes {
        let key = mapping.key.as_str();
        let Some(field) = definition.field(key) else {
            issues.push(
                ConfigIssue::new(
                    ConfigErrorKind::UnknownAttribute,
                    format!("Unknown attribute for type {}", definition.name),
                )
                .in_representation(label)
                .on_attribute(key),
            );
            continue;
        };
        if !field.multiple() && mapping.based_on_ids().len() > 1 {
            issues.push(
                ConfigIssue::new(ConfigErrorKind::MultipleNotAllowed, "Attribute can't be multiple")
                    .in_representation(label)
                    .on_attribute(key),
            );
        }
    }
}
