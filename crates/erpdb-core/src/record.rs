use crate::{
    CREATED_AT_FIELD, ID_FIELD, RESERVED_FIELDS, UPDATED_AT_FIELD,
    error::{ErrorClass, ErrorOrigin, InternalError},
    types::{RecordId, Timestamp},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error as ThisError;

///
/// RecordError
///

#[derive(Debug, ThisError)]
pub enum RecordError {
    #[error("record is missing a valid '{ID_FIELD}' field")]
    MissingId,

    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}

impl From<RecordError> for InternalError {
    fn from(err: RecordError) -> Self {
        Self::new(ErrorClass::Corruption, ErrorOrigin::Store, err.to_string())
    }
}

///
/// Fields
///
/// Caller-supplied field map for creates and patches.
///

pub type Fields = Map<String, Value>;

///
/// Record
///
/// One entity record: a JSON object that always holds a valid `id`.
/// Serializes as the bare object so persisted blobs stay plain JSON.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Record {
    id: RecordId,
    fields: Map<String, Value>,
}

impl Record {
    /// Build a new record from caller fields plus server-assigned values.
    /// Reserved keys in `fields` are dropped.
    #[must_use]
    pub fn assemble(id: RecordId, fields: Fields, stamp: &str) -> Self {
        let mut fields = strip_reserved(fields);
        fields.insert(ID_FIELD.to_string(), id.to_value());
        fields.insert(CREATED_AT_FIELD.to_string(), Value::String(stamp.to_string()));
        fields.insert(UPDATED_AT_FIELD.to_string(), Value::String(stamp.to_string()));

        Self { id, fields }
    }

    #[must_use]
    pub const fn id(&self) -> &RecordId {
        &self.id
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Text value of a field, if it is a string.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    #[must_use]
    pub fn created_at(&self) -> Option<&str> {
        self.text(CREATED_AT_FIELD)
    }

    #[must_use]
    pub fn updated_at(&self) -> Option<&str> {
        self.text(UPDATED_AT_FIELD)
    }

    /// Parsed `updatedAt`, ignoring values that are not valid timestamps.
    #[must_use]
    pub fn updated_at_timestamp(&self) -> Option<Timestamp> {
        self.updated_at().and_then(|s| Timestamp::parse_iso(s).ok())
    }

    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Shallow merge: patch fields overwrite, all others are retained.
    /// Reserved keys in the patch are ignored; `updatedAt` is set to `stamp`.
    pub fn merge(&mut self, patch: Fields, stamp: &str) {
        for (key, value) in strip_reserved(patch) {
            self.fields.insert(key, value);
        }
        self.fields
            .insert(UPDATED_AT_FIELD.to_string(), Value::String(stamp.to_string()));
    }
}

impl TryFrom<Map<String, Value>> for Record {
    type Error = RecordError;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = fields
            .get(ID_FIELD)
            .and_then(RecordId::from_value)
            .ok_or(RecordError::MissingId)?;

        Ok(Self { id, fields })
    }
}

impl TryFrom<Value> for Record {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Self::try_from(map),
            other => Err(RecordError::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }
}

impl From<Record> for Map<String, Value> {
    fn from(record: Record) -> Self {
        record.fields
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::Object(record.fields)
    }
}

/// Remove server-assigned keys from a caller-supplied map.
#[must_use]
pub fn strip_reserved(mut fields: Fields) -> Fields {
    for key in RESERVED_FIELDS {
        fields.remove(key);
    }

    fields
}

pub(crate) const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fields must be an object"),
        }
    }

    #[test]
    fn assemble_overrides_reserved_fields() {
        let record = Record::assemble(
            RecordId::from("new"),
            fields(json!({ "id": "spoofed", "createdAt": "x", "buyerName": "Acme" })),
            "2024-01-01T00:00:00.000Z",
        );

        assert_eq!(record.id(), &RecordId::from("new"));
        assert_eq!(record.get("id"), Some(&json!("new")));
        assert_eq!(record.created_at(), Some("2024-01-01T00:00:00.000Z"));
        assert_eq!(record.created_at(), record.updated_at());
        assert_eq!(record.text("buyerName"), Some("Acme"));
    }

    #[test]
    fn merge_is_shallow_and_keeps_identity() {
        let mut record = Record::try_from(json!({
            "id": 1,
            "status": "active",
            "address": { "city": "Jakarta", "zip": "10110" },
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z"
        }))
        .unwrap();

        record.merge(
            fields(json!({ "id": 99, "address": { "city": "Bandung" } })),
            "2024-02-01T00:00:00.000Z",
        );

        assert_eq!(record.id(), &RecordId::Int(1));
        assert_eq!(record.get("id"), Some(&json!(1)));
        assert_eq!(record.get("status"), Some(&json!("active")));
        assert_eq!(record.get("address"), Some(&json!({ "city": "Bandung" })));
        assert_eq!(record.created_at(), Some("2024-01-01T00:00:00.000Z"));
        assert_eq!(record.updated_at(), Some("2024-02-01T00:00:00.000Z"));
    }

    #[test]
    fn deserialize_requires_an_id() {
        let err = serde_json::from_value::<Record>(json!({ "name": "x" })).unwrap_err();
        assert!(err.to_string().contains("missing a valid 'id'"));

        assert!(matches!(
            Record::try_from(json!([1, 2])),
            Err(RecordError::NotAnObject { found: "array" })
        ));
    }

    #[test]
    fn serializes_as_the_plain_object() {
        let source = json!({ "id": "a", "n": 1.25, "tags": ["x"] });
        let record = Record::try_from(source.clone()).unwrap();

        assert_eq!(serde_json::to_value(&record).unwrap(), source);
    }
}
