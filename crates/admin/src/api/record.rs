//! Untyped resource records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use storekeep_core::RecordId;

/// A record as the backend returns it: a bag of JSON fields plus an id.
///
/// The client enforces no invariants on the shape. The identifier is read
/// from `_id`, falling back to `id`, and may be a string or an integer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

/// The settings singleton has no identity of its own.
pub type Settings = Record;

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The record's identifier, if it carries a usable one.
    #[must_use]
    pub fn id(&self) -> Option<RecordId> {
        ["_id", "id"]
            .iter()
            .find_map(|key| match self.0.get(*key)? {
                Value::String(s) if !s.is_empty() => Some(RecordId::new(s.as_str())),
                Value::Number(n) => Some(RecordId::new(n.to_string())),
                _ => None,
            })
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String value of `field`, if it is a string.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Boolean value of `field`, if it is a boolean.
    #[must_use]
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.0.get(field).and_then(Value::as_bool)
    }

    /// Set `field`, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Builder-style [`Record::insert`].
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Record {
    type Error = Value;

    /// Only JSON objects are records; anything else is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        Record::try_from(value).unwrap()
    }

    #[test]
    fn test_id_prefers_underscore_id() {
        let r = record(json!({"_id": "64f1", "id": "other", "name": "Tee"}));
        assert_eq!(r.id().unwrap().as_str(), "64f1");
    }

    #[test]
    fn test_id_falls_back_to_id_and_numbers() {
        assert_eq!(record(json!({"id": 7})).id().unwrap().as_str(), "7");
        assert_eq!(record(json!({"_id": "", "id": "x"})).id().unwrap().as_str(), "x");
        assert!(record(json!({"name": "no id"})).id().is_none());
        assert!(record(json!({"_id": null})).id().is_none());
    }

    #[test]
    fn test_fields_pass_through_unchanged() {
        let raw = json!({"_id": "1", "nested": {"a": [1, 2]}, "price": 12.5});
        let r: Record = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&r).unwrap(), raw);
    }

    #[test]
    fn test_accessors() {
        let r = Record::new()
            .with("status", "pending")
            .with("isActive", true);
        assert_eq!(r.get_str("status"), Some("pending"));
        assert_eq!(r.get_bool("isActive"), Some(true));
        assert_eq!(r.get_bool("status"), None);
    }

    #[test]
    fn test_non_objects_are_rejected() {
        assert!(Record::try_from(json!([1, 2])).is_err());
        assert!(serde_json::from_value::<Record>(json!("text")).is_err());
    }
}
