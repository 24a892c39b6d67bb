//! Per-collection schema: required fields, declared field types, search and
//! filter surfaces, and the explicit sort-key registry.

use crate::{
    db::direction::Direction,
    error::{ErrorClass, ErrorOrigin, InternalError},
    record::{Fields, Record},
    types::RecordId,
    value,
};
use derive_more::Display;
use serde_json::{Map, Value};
use thiserror::Error as ThisError;

///
/// SchemaError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("collection '{collection}' requires field '{field}'")]
    MissingField {
        collection: &'static str,
        field: &'static str,
    },

    #[error("field '{field}' of '{collection}' expects {expected}")]
    InvalidType {
        collection: &'static str,
        field: String,
        expected: FieldType,
    },
}

impl From<SchemaError> for InternalError {
    fn from(err: SchemaError) -> Self {
        Self::new(ErrorClass::Validation, ErrorOrigin::Schema, err.to_string())
    }
}

///
/// FieldType
///
/// Shape a declared field must have whenever it is present.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum FieldType {
    #[display("text")]
    Text,

    #[display("a number")]
    Number,

    #[display("a non-negative integer")]
    Count,

    #[display("a record id")]
    Id,

    #[display("a list of text")]
    TextList,

    #[display("an object")]
    Object(&'static [FieldSpec]),
}

impl FieldType {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::Number => value.is_number(),
            Self::Count => value.as_u64().is_some(),
            Self::Id => RecordId::from_value(value).is_some(),
            Self::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            Self::Object(_) => value.is_object(),
        }
    }
}

///
/// FieldSpec
///
/// One declared field. Null is rejected unless the field is nullable.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub nullable: bool,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            nullable: false,
        }
    }

    #[must_use]
    pub const fn text(name: &'static str) -> Self {
        Self::new(name, FieldType::Text)
    }

    #[must_use]
    pub const fn number(name: &'static str) -> Self {
        Self::new(name, FieldType::Number)
    }

    #[must_use]
    pub const fn count(name: &'static str) -> Self {
        Self::new(name, FieldType::Count)
    }

    #[must_use]
    pub const fn id(name: &'static str) -> Self {
        Self::new(name, FieldType::Id)
    }

    #[must_use]
    pub const fn text_list(name: &'static str) -> Self {
        Self::new(name, FieldType::TextList)
    }

    #[must_use]
    pub const fn object(name: &'static str, fields: &'static [Self]) -> Self {
        Self::new(name, FieldType::Object(fields))
    }

    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    // `path` is the dotted location used in error messages.
    fn check(
        &self,
        collection: &'static str,
        path: String,
        value: &Value,
    ) -> Result<(), SchemaError> {
        if value.is_null() && self.nullable {
            return Ok(());
        }
        if !self.ty.accepts(value) {
            return Err(SchemaError::InvalidType {
                collection,
                field: path,
                expected: self.ty,
            });
        }
        if let (FieldType::Object(nested), Value::Object(map)) = (self.ty, value) {
            check_fields(collection, nested, map, &path)?;
        }

        Ok(())
    }
}

fn check_fields(
    collection: &'static str,
    specs: &[FieldSpec],
    fields: &Map<String, Value>,
    prefix: &str,
) -> Result<(), SchemaError> {
    for spec in specs {
        if let Some(value) = fields.get(spec.name) {
            let path = if prefix.is_empty() {
                spec.name.to_string()
            } else {
                format!("{prefix}.{}", spec.name)
            };
            spec.check(collection, path, value)?;
        }
    }

    Ok(())
}

///
/// FieldAccessor
///
/// Reads one sortable value out of a record. Nested values get an explicit
/// function instead of a runtime path walk.
///

#[derive(Clone, Copy)]
pub enum FieldAccessor {
    Field(&'static str),
    Computed(for<'a> fn(&'a Record) -> Option<&'a Value>),
}

impl FieldAccessor {
    #[must_use]
    pub fn read<'a>(&self, record: &'a Record) -> Option<&'a Value> {
        match self {
            Self::Field(name) => record.get(name),
            Self::Computed(f) => f(record),
        }
    }
}

impl std::fmt::Debug for FieldAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(name) => write!(f, "Field({name})"),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

///
/// SortKey
///

#[derive(Clone, Copy, Debug)]
pub struct SortKey {
    pub name: &'static str,
    pub accessor: FieldAccessor,
}

impl SortKey {
    /// Sort key reading the top-level field of the same name.
    #[must_use]
    pub const fn field(name: &'static str) -> Self {
        Self {
            name,
            accessor: FieldAccessor::Field(name),
        }
    }

    /// Sort key backed by an explicit accessor function.
    #[must_use]
    pub const fn computed(
        name: &'static str,
        accessor: for<'a> fn(&'a Record) -> Option<&'a Value>,
    ) -> Self {
        Self {
            name,
            accessor: FieldAccessor::Computed(accessor),
        }
    }
}

///
/// Schema
///
/// Static description of one collection. Built in `const` context by the
/// entity definitions and registered with the `Db` at startup.
///

#[derive(Debug)]
pub struct Schema {
    pub collection: &'static str,

    /// Fields that must be present and non-null at create time.
    pub required: &'static [&'static str],

    /// Typed fields; undeclared fields are stored as given.
    pub fields: &'static [FieldSpec],

    /// Text fields scanned by free-text search.
    pub search: &'static [&'static str],

    /// Categorical fields accepted as equality filters.
    pub filters: &'static [&'static str],

    pub sort_keys: &'static [SortKey],
    pub default_sort: (&'static str, Direction),
}

impl Schema {
    /// Look up a registered sort key by name.
    #[must_use]
    pub fn sort_key(&self, name: &str) -> Option<&SortKey> {
        self.sort_keys.iter().find(|key| key.name == name)
    }

    #[must_use]
    pub fn is_filterable(&self, field: &str) -> bool {
        self.filters.contains(&field)
    }

    /// Check create-time fields against the required list and field types.
    pub fn validate_create(&self, fields: &Fields) -> Result<(), SchemaError> {
        for &field in self.required {
            if matches!(fields.get(field), None | Some(Value::Null)) {
                return Err(SchemaError::MissingField {
                    collection: self.collection,
                    field,
                });
            }
        }

        check_fields(self.collection, self.fields, fields, "")
    }

    /// Check a patch: required fields may be left out but not nulled.
    pub fn validate_patch(&self, patch: &Fields) -> Result<(), SchemaError> {
        for &field in self.required {
            if matches!(patch.get(field), Some(Value::Null)) {
                return Err(SchemaError::MissingField {
                    collection: self.collection,
                    field,
                });
            }
        }

        check_fields(self.collection, self.fields, patch, "")
    }

    /// Check a whole stored record, as on import.
    pub fn validate_record(&self, record: &Record) -> Result<(), SchemaError> {
        self.validate_create(record.fields())
    }

    /// True when any searchable field contains the lower-cased needle.
    #[must_use]
    pub fn search_matches(&self, record: &Record, needle: &str) -> bool {
        self.search
            .iter()
            .any(|field| value::contains_text(record.get(field), needle))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested_total(record: &Record) -> Option<&Value> {
        record.get("total")?.get("output")
    }

    const SCHEMA: Schema = Schema {
        collection: "widgets",
        required: &["name"],
        fields: &[
            FieldSpec::text("name"),
            FieldSpec::count("stock"),
            FieldSpec::id("ownerId"),
            FieldSpec::text("checkedAt").nullable(),
            FieldSpec::text_list("tags"),
            FieldSpec::object("total", &[FieldSpec::number("output")]),
        ],
        search: &["name", "owner"],
        filters: &["status"],
        sort_keys: &[
            SortKey::field("name"),
            SortKey::computed("total.output", nested_total),
        ],
        default_sort: ("name", Direction::Asc),
    };

    #[test]
    fn required_fields_reject_missing_and_null() {
        let ok = json!({ "name": "w" });
        let null = json!({ "name": null });
        let missing = json!({ "owner": "x" });

        assert!(SCHEMA.validate_create(ok.as_object().unwrap()).is_ok());
        assert_eq!(
            SCHEMA.validate_create(null.as_object().unwrap()),
            Err(SchemaError::MissingField {
                collection: "widgets",
                field: "name"
            })
        );
        assert!(SCHEMA.validate_create(missing.as_object().unwrap()).is_err());
    }

    #[test]
    fn declared_types_are_enforced_on_create() {
        let ok = json!({
            "name": "w",
            "stock": 3,
            "ownerId": "01H",
            "checkedAt": null,
            "extra": [1],
        });
        let negative = json!({ "name": "w", "stock": -1 });
        let blank_id = json!({ "name": "w", "ownerId": "" });
        let nulled = json!({ "name": "w", "stock": null });
        let mixed_tags = json!({ "name": "w", "tags": ["a", 1] });

        assert!(SCHEMA.validate_create(ok.as_object().unwrap()).is_ok());
        for bad in [negative, blank_id, nulled, mixed_tags] {
            assert!(matches!(
                SCHEMA.validate_create(bad.as_object().unwrap()),
                Err(SchemaError::InvalidType { .. })
            ));
        }
    }

    #[test]
    fn nested_fields_report_their_path() {
        let bad = json!({ "name": "w", "total": { "output": "lots" } });

        assert_eq!(
            SCHEMA.validate_create(bad.as_object().unwrap()),
            Err(SchemaError::InvalidType {
                collection: "widgets",
                field: "total.output".to_string(),
                expected: FieldType::Number,
            })
        );
    }

    #[test]
    fn patches_may_omit_but_not_null_required_fields() {
        let partial = json!({ "stock": 4 });
        let nulled = json!({ "name": null });
        let mistyped = json!({ "name": 7 });

        assert!(SCHEMA.validate_patch(partial.as_object().unwrap()).is_ok());
        assert!(matches!(
            SCHEMA.validate_patch(nulled.as_object().unwrap()),
            Err(SchemaError::MissingField { field: "name", .. })
        ));
        assert!(matches!(
            SCHEMA.validate_patch(mistyped.as_object().unwrap()),
            Err(SchemaError::InvalidType { .. })
        ));
    }

    #[test]
    fn computed_accessor_reads_nested_values() {
        let record = Record::try_from(json!({ "id": 1, "total": { "output": 40 } })).unwrap();
        let key = SCHEMA.sort_key("total.output").unwrap();

        assert_eq!(key.accessor.read(&record), Some(&json!(40)));
        assert!(SCHEMA.sort_key("total").is_none());
    }

    #[test]
    fn search_scans_declared_fields_only() {
        let record =
            Record::try_from(json!({ "id": 1, "name": "Bolt", "note": "needle" })).unwrap();

        assert!(SCHEMA.search_matches(&record, "bol"));
        assert!(!SCHEMA.search_matches(&record, "needle"));
    }
}
