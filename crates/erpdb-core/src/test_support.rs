//! Shared fixtures for unit tests.

use crate::{
    db::direction::Direction,
    record::{Fields, Record},
    schema::{FieldSpec, Schema, SortKey},
};
use serde_json::{Value, json};

fn nested_score(record: &Record) -> Option<&Value> {
    record.get("metrics")?.get("score")
}

/// Buyer-shaped schema used across engine tests.
pub(crate) const BUYERS: Schema = Schema {
    collection: "buyers",
    required: &["buyerName"],
    fields: &[
        FieldSpec::text("buyerName"),
        FieldSpec::text("status"),
        FieldSpec::number("totalValue"),
    ],
    search: &["buyerName", "contactPerson", "email", "country"],
    filters: &["status", "country"],
    sort_keys: &[
        SortKey::field("buyerName"),
        SortKey::field("createdAt"),
        SortKey::field("totalValue"),
        SortKey::computed("metrics.score", nested_score),
    ],
    default_sort: ("createdAt", Direction::Desc),
};

/// Minimal record with an integer id and a status.
pub(crate) fn record(id: u64, status: &str) -> Record {
    Record::try_from(json!({ "id": id, "status": status })).expect("fixture record is valid")
}

/// Buyer record with every searchable field populated.
pub(crate) fn buyer(id: u64, name: &str, status: &str, country: &str) -> Record {
    Record::try_from(json!({
        "id": id,
        "buyerName": name,
        "contactPerson": format!("Contact {id}"),
        "email": format!("buyer{id}@example.com"),
        "country": country,
        "status": status,
        "totalValue": id * 100,
        "metrics": { "score": 100 - id },
        "createdAt": format!("2024-01-{:02}T00:00:00.000Z", id % 28 + 1),
        "updatedAt": format!("2024-01-{:02}T00:00:00.000Z", id % 28 + 1),
    }))
    .expect("fixture buyer is valid")
}

/// Object literal as a field map.
pub(crate) fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => panic!("fixture fields must be an object"),
    }
}
