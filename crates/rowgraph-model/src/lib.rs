pub mod column;
pub mod error;
pub mod ids;
pub mod issues;
pub mod mapper;
pub mod object;
pub mod redact;
pub mod value;

pub use column::{cell_at, column_index, column_label};
pub use error::{ModelError, Result};
pub use ids::{RepresentationId, StandardId, type_slug};
pub use issues::{ConfigErrorKind, ConfigIssue, ValidationReport};
pub use mapper::{
    ActivationPredicate, AttributeColumn, AttributeMapping, BasedOn, ColumnConfiguration,
    MapperConfig, Operator, Representation, RepresentationKind, RepresentationTarget,
};
pub use object::ProducedObject;
pub use redact::redact_value;
pub use value::{ObjectRef, Value};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_report_counts() {
        let report = ValidationReport {
            mapper_name: "people".to_string(),
            issues: vec![
                ConfigIssue::new(ConfigErrorKind::SelfReference, "Can't reference the representation itself")
                    .in_representation("#1 Person")
                    .on_attribute("created_by"),
                ConfigIssue::new(ConfigErrorKind::SelfReference, "Can't reference the representation itself")
                    .in_representation("#2 Person"),
                ConfigIssue::new(ConfigErrorKind::ReferenceCycle, "Reference cycle found"),
            ],
        };
        assert!(!report.is_valid());
        assert!(report.has(ConfigErrorKind::ReferenceCycle));
        let counts = report.count_by_kind();
        assert_eq!(counts[&ConfigErrorKind::SelfReference], 2);
        assert_eq!(counts[&ConfigErrorKind::ReferenceCycle], 1);
    }

    #[test]
    fn issue_display_names_representation_and_attribute() {
        let issue = ConfigIssue::new(
            ConfigErrorKind::MissingRequiredValue,
            "Missing values for required attribute",
        )
        .in_representation("#1 Person")
        .on_attribute("name");
        assert_eq!(
            issue.to_string(),
            "[missing_required_value] #1 Person (name): Missing values for required attribute"
        );
    }
}
