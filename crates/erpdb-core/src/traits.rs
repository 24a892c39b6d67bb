use crate::{
    error::InternalError,
    record::{Fields, Record},
    schema::Schema,
    types::RecordId,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

///
/// EntityKind
///
/// A typed view over the records of one collection.
///

pub trait EntityKind: Clone + Serialize + DeserializeOwned + Send + 'static {
    const SCHEMA: &'static Schema;

    fn id(&self) -> &RecordId;

    /// Decode a typed entity from its stored record.
    fn from_record(record: &Record) -> Result<Self, InternalError> {
        serde_json::from_value(Value::Object(record.fields().clone())).map_err(|err| {
            InternalError::serialize_corruption(format!(
                "record {} in '{}' does not decode: {err}",
                record.id(),
                Self::SCHEMA.collection
            ))
        })
    }
}

/// Encode any serializable payload as a create/patch field map.
pub fn to_fields<T: Serialize>(payload: &T) -> Result<Fields, InternalError> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(InternalError::serialize_internal(format!(
            "payload must encode as an object, found {}",
            crate::record::json_kind(&other)
        ))),
        Err(err) => Err(InternalError::serialize_internal(err.to_string())),
    }
}
