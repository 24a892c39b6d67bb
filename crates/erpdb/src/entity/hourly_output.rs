use super::HOURLY_OUTPUT_REPORT;
use erpdb_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(super) const SCHEMA: Schema = Schema {
    collection: HOURLY_OUTPUT_REPORT,
    required: &["date", "shift"],
    fields: &[
        FieldSpec::text("date"),
        FieldSpec::text("shift"),
        FieldSpec::number("dailyOutput"),
        FieldSpec::number("dailyAmount"),
        FieldSpec::number("target"),
    ],
    search: &["date", "shift", "line"],
    filters: &["date", "shift", "line"],
    sort_keys: &[
        SortKey::field("date"),
        SortKey::field("shift"),
        SortKey::field("dailyOutput"),
        SortKey::field("dailyAmount"),
        SortKey::field("target"),
        SortKey::field("createdAt"),
    ],
    default_sort: ("date", Direction::Desc),
};

pub const SHIFT_DAY: &str = "day";
pub const SHIFT_NIGHT: &str = "night";

///
/// HourlyOutputReport
///
/// Output of one shift on one date. `date` is `YYYY-MM-DD`, so text
/// comparison orders dates.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyOutputReport {
    pub id: RecordId,

    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub shift: String,

    #[serde(default)]
    pub daily_output: f64,

    #[serde(default)]
    pub daily_amount: f64,

    #[serde(default)]
    pub target: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

entity_kind!(HourlyOutputReport, SCHEMA);
