use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::Value;

///
/// RecordId
///
/// Identifier of a record within its collection.
/// Generated ids are ULID text; seeded data may carry plain integers.
/// Equality is exact, so `Text("1")` and `Int(1)` are different ids.
///

#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(u64),
    Text(String),
}

impl RecordId {
    /// Read an identifier out of a JSON value.
    /// Only non-empty strings and unsigned integers qualify.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            Value::Number(n) => n.as_u64().map(Self::Int),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(n) => Value::from(*n),
            Self::Text(s) => Value::String(s.clone()),
        }
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<ulid::Ulid> for RecordId {
    fn from(ulid: ulid::Ulid) -> Self {
        Self::Text(ulid.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_accepts_text_and_unsigned_ints_only() {
        assert_eq!(RecordId::from_value(&json!("b-1")), Some(RecordId::from("b-1")));
        assert_eq!(RecordId::from_value(&json!(42)), Some(RecordId::Int(42)));
        assert_eq!(RecordId::from_value(&json!("")), None);
        assert_eq!(RecordId::from_value(&json!(-3)), None);
        assert_eq!(RecordId::from_value(&json!(1.5)), None);
        assert_eq!(RecordId::from_value(&json!(null)), None);
    }

    #[test]
    fn text_and_int_ids_never_match_each_other() {
        assert_ne!(RecordId::from_value(&json!("1")), Some(RecordId::Int(1)));
        assert_ne!(RecordId::from_value(&json!(1)), Some(RecordId::from("1")));
        assert_eq!(RecordId::from_value(&json!(1)), Some(RecordId::Int(1)));
    }

    #[test]
    fn serde_is_untagged() {
        let ids = vec![RecordId::Int(3), RecordId::from("abc")];
        let text = serde_json::to_string(&ids).unwrap();

        assert_eq!(text, r#"[3,"abc"]"#);
        assert_eq!(serde_json::from_str::<Vec<RecordId>>(&text).unwrap(), ids);
    }
}
