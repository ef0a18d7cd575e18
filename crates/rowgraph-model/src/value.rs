use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::StandardId;

/// Largest integer an f64 holds exactly; whole numbers below it serialize as integers.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Pointer to another object, produced in the same record or already stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub standard_id: StandardId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
}

impl ObjectRef {
    pub fn new(standard_id: StandardId) -> Self {
        Self {
            standard_id,
            entity_type: None,
        }
    }

    pub fn with_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    Ref(ObjectRef),
    List(Vec<Value>),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Empty text and empty lists count as "not populated".
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_ref_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Ref(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// JSON rendering used both for output and for identity digests.
    ///
    /// References render as their `standard_id` only when `refs_as_ids` is set so
    /// that digests do not depend on the referenced object's type tag.
    pub fn to_json(&self, refs_as_ids: bool) -> serde_json::Value {
        match self {
            Self::Text(text) => serde_json::Value::String(text.clone()),
            Self::Number(number) => number_to_json(*number),
            Self::Boolean(flag) => serde_json::Value::Bool(*flag),
            Self::Date(date) => {
                serde_json::Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Self::Ref(object) => {
                if refs_as_ids {
                    serde_json::Value::String(object.standard_id.as_str().to_string())
                } else {
                    serde_json::to_value(object).unwrap_or(serde_json::Value::Null)
                }
            }
            Self::List(items) => serde_json::Value::Array(
                items.iter().map(|item| item.to_json(refs_as_ids)).collect(),
            ),
        }
    }
}

fn number_to_json(number: f64) -> serde_json::Value {
    if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
        return serde_json::Value::from(number as i64);
    }
    serde_json::Number::from_f64(number)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json(false).serialize(serializer)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Self::Ref(value)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn whole_numbers_render_as_integers() {
        assert_eq!(Value::Number(3.0).to_json(false), serde_json::json!(3));
        assert_eq!(Value::Number(2.5).to_json(false), serde_json::json!(2.5));
    }

    #[test]
    fn dates_render_as_iso_strings() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap();
        assert_eq!(
            Value::Date(date).to_json(false),
            serde_json::json!("2024-01-15T08:30:00.000Z")
        );
    }

    #[test]
    fn refs_collapse_to_ids_for_digests() {
        let value = Value::Ref(ObjectRef::new(StandardId::new("person--1")).with_type("Person"));
        assert_eq!(value.to_json(true), serde_json::json!("person--1"));
        assert_eq!(
            value.to_json(false),
            serde_json::json!({"standard_id": "person--1", "entity_type": "Person"})
        );
    }
}
