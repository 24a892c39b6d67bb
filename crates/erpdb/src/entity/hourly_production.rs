use super::HOURLY_PRODUCTION;
use erpdb_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn total_output(record: &Record) -> Option<&Value> {
    record.get("total")?.get("output")
}

fn total_amount(record: &Record) -> Option<&Value> {
    record.get("total")?.get("amount")
}

pub(super) const SCHEMA: Schema = Schema {
    collection: HOURLY_PRODUCTION,
    required: &["team"],
    fields: &[
        FieldSpec::text("team"),
        FieldSpec::text("style"),
        FieldSpec::text("color"),
        FieldSpec::object(
            "total",
            &[FieldSpec::number("output"), FieldSpec::number("amount")],
        ),
    ],
    search: &["team", "style", "color"],
    filters: &["team", "style", "color", "date"],
    sort_keys: &[
        SortKey::field("team"),
        SortKey::field("style"),
        SortKey::field("color"),
        SortKey::field("date"),
        SortKey::computed("total.output", total_output),
        SortKey::computed("total.amount", total_amount),
        SortKey::field("createdAt"),
    ],
    default_sort: ("createdAt", Direction::Desc),
};

///
/// ProductionTotal
///

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ProductionTotal {
    #[serde(default)]
    pub output: f64,

    #[serde(default)]
    pub amount: f64,
}

///
/// HourlyProduction
///
/// One team's hour-by-hour output for a style and colour.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyProduction {
    pub id: RecordId,

    #[serde(default)]
    pub team: String,

    #[serde(default)]
    pub style: String,

    #[serde(default)]
    pub color: String,

    #[serde(default)]
    pub total: ProductionTotal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

entity_kind!(HourlyProduction, SCHEMA);
