//! Coercion of raw cell text into typed values.
//!
//! Formatting never fails: input that cannot be read as the declared type is
//! treated as absent and the caller moves on.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::trace;

use rowgraph_model::{ColumnConfiguration, Value, redact_value};
use rowgraph_schema::{AttrType, AttributeDefinition};

const TRUE_WORDS: [&str; 3] = ["true", "yes", "1"];

/// Formats tried, in order, when no date pattern is configured.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Formats one raw string as `attr_type`. Returns `None` for blank or unreadable input.
pub fn format_value(
    raw: &str,
    attr_type: AttrType,
    config: Option<&ColumnConfiguration>,
) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = match attr_type {
        AttrType::String => Some(Value::text(trimmed)),
        AttrType::Numeric => parse_number(trimmed).map(Value::Number),
        AttrType::Boolean => Some(Value::Boolean(parse_boolean(trimmed))),
        AttrType::Date => parse_date(
            trimmed,
            config.and_then(|c| c.pattern_date.as_deref()),
            config.and_then(|c| c.timezone.as_deref()),
        )
        .map(Value::Date),
    };
    if value.is_none() {
        trace!(value = redact_value(raw), %attr_type, "value not readable, treated as absent");
    }
    value
}

/// Computes a column-sourced value, splitting multi-valued cells on the configured separator.
pub fn compute_value(
    raw: &str,
    definition: &AttributeDefinition,
    config: Option<&ColumnConfiguration>,
) -> Option<Value> {
    if raw.is_empty() {
        return None;
    }
    if !definition.multiple {
        return format_value(raw, definition.attr_type, config);
    }
    let separator = config
        .and_then(|c| c.separator.as_deref())
        .filter(|sep| !sep.is_empty());
    let values: Vec<Value> = match separator {
        Some(sep) => raw
            .split(sep)
            .filter_map(|part| format_value(part, definition.attr_type, config))
            .collect(),
        None => format_value(raw, definition.attr_type, config)
            .into_iter()
            .collect(),
    };
    (!values.is_empty()).then_some(Value::List(values))
}

/// Computes a value from literal defaults. Single-valued attributes keep the first one.
pub fn compute_default_value(
    defaults: &[String],
    definition: &AttributeDefinition,
    config: Option<&ColumnConfiguration>,
) -> Option<Value> {
    if definition.multiple {
        let values: Vec<Value> = defaults
            .iter()
            .filter_map(|raw| format_value(raw, definition.attr_type, config))
            .collect();
        return (!values.is_empty()).then_some(Value::List(values));
    }
    defaults
        .first()
        .and_then(|raw| format_value(raw, definition.attr_type, config))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_boolean(raw: &str) -> bool {
    let lowered = raw.to_lowercase();
    TRUE_WORDS.contains(&lowered.as_str())
}

/// Parses a date with an optional chrono pattern, read in an optional IANA timezone.
///
/// Values without an explicit offset are read in `timezone`, or UTC when none is
/// configured. An unknown timezone name makes the value unreadable.
pub fn parse_date(raw: &str, pattern: Option<&str>, timezone: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let tz = match timezone.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => Some(name.parse::<Tz>().ok()?),
        None => None,
    };
    match pattern.filter(|p| !p.trim().is_empty()) {
        Some(pattern) => parse_with_pattern(raw, pattern, tz),
        None => parse_permissive(raw, tz),
    }
}

fn parse_with_pattern(raw: &str, pattern: &str, tz: Option<Tz>) -> Option<DateTime<Utc>> {
    if let Ok(with_offset) = DateTime::parse_from_str(raw, pattern) {
        return Some(with_offset.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
        return localize(naive, tz);
    }
    NaiveDate::parse_from_str(raw, pattern)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|naive| localize(naive, tz))
}

fn parse_permissive(raw: &str, tz: Option<Tz>) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return localize(naive, tz);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0).and_then(|naive| localize(naive, tz));
        }
    }
    None
}

fn localize(naive: NaiveDateTime, tz: Option<Tz>) -> Option<DateTime<Utc>> {
    match tz {
        Some(tz) => tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc)),
        None => Some(Utc.from_utc_datetime(&naive)),
    }
}

#[cfg(test)]
mod tests {
    use rowgraph_schema::MandatoryType;

    use super::*;

    fn definition(attr_type: AttrType, multiple: bool) -> AttributeDefinition {
        AttributeDefinition {
            name: "field".to_string(),
            label: None,
            attr_type,
            multiple,
            mandatory: MandatoryType::No,
        }
    }

    fn separator(sep: &str) -> ColumnConfiguration {
        ColumnConfiguration {
            separator: Some(sep.to_string()),
            ..ColumnConfiguration::default()
        }
    }

    fn iso(value: &Value) -> String {
        value.to_json(false).as_str().unwrap_or_default().to_string()
    }

    #[test]
    fn text_is_trimmed() {
        assert_eq!(
            format_value("  Alice ", AttrType::String, None),
            Some(Value::text("Alice"))
        );
        assert_eq!(format_value("   ", AttrType::String, None), None);
    }

    #[test]
    fn numbers_that_do_not_parse_are_absent() {
        assert_eq!(format_value(" 42 ", AttrType::Numeric, None), Some(Value::Number(42.0)));
        assert_eq!(format_value("4.5", AttrType::Numeric, None), Some(Value::Number(4.5)));
        assert_eq!(format_value("forty", AttrType::Numeric, None), None);
        assert_eq!(format_value("NaN", AttrType::Numeric, None), None);
        assert_eq!(format_value("inf", AttrType::Numeric, None), None);
    }

    #[test]
    fn booleans_accept_small_vocabulary() {
        for raw in ["true", "TRUE", " Yes ", "1"] {
            assert_eq!(format_value(raw, AttrType::Boolean, None), Some(Value::Boolean(true)));
        }
        for raw in ["false", "no", "0", "y"] {
            assert_eq!(format_value(raw, AttrType::Boolean, None), Some(Value::Boolean(false)));
        }
    }

    #[test]
    fn dates_parse_permissively_in_utc() {
        let value = format_value("2024-01-15", AttrType::Date, None).unwrap();
        assert_eq!(iso(&value), "2024-01-15T00:00:00.000Z");
        let value = format_value("2024-01-15T08:30:00+02:00", AttrType::Date, None).unwrap();
        assert_eq!(iso(&value), "2024-01-15T06:30:00.000Z");
        assert_eq!(format_value("not a date", AttrType::Date, None), None);
    }

    #[test]
    fn dates_follow_pattern_and_timezone() {
        let config = ColumnConfiguration {
            separator: None,
            pattern_date: Some("%d/%m/%Y %H:%M".to_string()),
            timezone: Some("Europe/Brussels".to_string()),
        };
        let value = format_value("15/01/2024 09:00", AttrType::Date, Some(&config)).unwrap();
        assert_eq!(iso(&value), "2024-01-15T08:00:00.000Z");

        let date_only = ColumnConfiguration {
            pattern_date: Some("%d.%m.%Y".to_string()),
            ..ColumnConfiguration::default()
        };
        let value = format_value("01.02.2024", AttrType::Date, Some(&date_only)).unwrap();
        assert_eq!(iso(&value), "2024-02-01T00:00:00.000Z");

        let unknown_zone = ColumnConfiguration {
            timezone: Some("Mars/Olympus".to_string()),
            ..config
        };
        assert_eq!(format_value("15/01/2024 09:00", AttrType::Date, Some(&unknown_zone)), None);
    }

    #[test]
    fn multiple_values_split_on_separator() {
        let value = compute_value("a|b|c", &definition(AttrType::String, true), Some(&separator("|")));
        assert_eq!(
            value,
            Some(Value::List(vec![Value::text("a"), Value::text("b"), Value::text("c")]))
        );
    }

    #[test]
    fn multiple_without_separator_wraps_single_value() {
        let value = compute_value("a|b", &definition(AttrType::String, true), None);
        assert_eq!(value, Some(Value::List(vec![Value::text("a|b")])));
    }

    #[test]
    fn single_valued_attribute_is_not_split() {
        let value = compute_value("a|b", &definition(AttrType::String, false), Some(&separator("|")));
        assert_eq!(value, Some(Value::text("a|b")));
        assert_eq!(compute_value("", &definition(AttrType::String, false), None), None);
    }

    #[test]
    fn unreadable_parts_are_dropped_from_lists() {
        let value = compute_value("1;x;3", &definition(AttrType::Numeric, true), Some(&separator(";")));
        assert_eq!(
            value,
            Some(Value::List(vec![Value::Number(1.0), Value::Number(3.0)]))
        );
        let value = compute_value("x;y", &definition(AttrType::Numeric, true), Some(&separator(";")));
        assert_eq!(value, None);
    }

    #[test]
    fn single_valued_defaults_keep_first_value() {
        let defaults = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(
            compute_default_value(&defaults, &definition(AttrType::String, false), None),
            Some(Value::text("a"))
        );
        assert_eq!(
            compute_default_value(&defaults, &definition(AttrType::String, true), None),
            Some(Value::List(vec![Value::text("a"), Value::text("b"), Value::text("c")]))
        );
    }
}
