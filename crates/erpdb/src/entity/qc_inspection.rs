use super::QC_INSPECTIONS;
use erpdb_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(super) const SCHEMA: Schema = Schema {
    collection: QC_INSPECTIONS,
    required: &["orderNumber", "inspectionDate", "qcStatus"],
    fields: &[
        FieldSpec::text("orderNumber"),
        FieldSpec::text("inspector"),
        FieldSpec::text("inspectionDate"),
        FieldSpec::number("sampleSize"),
        FieldSpec::number("passedQty"),
        FieldSpec::number("rejectedQty"),
        FieldSpec::text_list("rejectionReasons"),
        FieldSpec::text("qcStatus"),
    ],
    search: &["orderNumber", "inspector", "notes"],
    filters: &["qcStatus", "inspector", "inspectionDate"],
    sort_keys: &[
        SortKey::field("orderNumber"),
        SortKey::field("inspector"),
        SortKey::field("inspectionDate"),
        SortKey::field("sampleSize"),
        SortKey::field("passedQty"),
        SortKey::field("rejectedQty"),
        SortKey::field("createdAt"),
    ],
    default_sort: ("inspectionDate", Direction::Desc),
};

pub const QC_PASSED: &str = "passed";
pub const QC_FAILED: &str = "failed";
pub const QC_REWORK: &str = "rework";

///
/// QcInspection
///
/// A sampled quality check on one order. `inspectionDate` is `YYYY-MM-DD`.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QcInspection {
    pub id: RecordId,

    #[serde(default)]
    pub order_number: String,

    #[serde(default)]
    pub inspector: String,

    #[serde(default)]
    pub inspection_date: String,

    #[serde(default)]
    pub sample_size: f64,

    #[serde(default)]
    pub passed_qty: f64,

    #[serde(default)]
    pub rejected_qty: f64,

    /// Defect codes, e.g. `stitchingDefect`.
    #[serde(default)]
    pub rejection_reasons: Vec<String>,

    #[serde(default)]
    pub qc_status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QcInspection {
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.qc_status == QC_PASSED
    }
}

entity_kind!(QcInspection, SCHEMA);
