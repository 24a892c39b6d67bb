use super::{FARM_OUT, STATUS_COMPLETED};
use chrono::{DateTime, Utc};
use erpdb_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(super) const SCHEMA: Schema = Schema {
    collection: FARM_OUT,
    required: &["subcontractor", "expectedDate"],
    fields: &[
        FieldSpec::text("farmOutNumber"),
        FieldSpec::text("orderNumber"),
        FieldSpec::text("subcontractor"),
        FieldSpec::text("productName"),
        FieldSpec::text("status"),
        FieldSpec::number("totalSent"),
        FieldSpec::number("totalReceived"),
        FieldSpec::number("totalApproved"),
        FieldSpec::number("totalRejected"),
        FieldSpec::number("unitPrice"),
        FieldSpec::number("totalValue"),
        FieldSpec::text("sentDate"),
        FieldSpec::text("expectedDate"),
        FieldSpec::text("receivedDate").nullable(),
        FieldSpec::text("qualityGrade").nullable(),
    ],
    search: &["farmOutNumber", "orderNumber", "subcontractor", "productName"],
    filters: &["status", "subcontractor", "qualityGrade"],
    sort_keys: &[
        SortKey::field("farmOutNumber"),
        SortKey::field("subcontractor"),
        SortKey::field("status"),
        SortKey::field("totalSent"),
        SortKey::field("totalValue"),
        SortKey::field("sentDate"),
        SortKey::field("expectedDate"),
        SortKey::field("createdAt"),
    ],
    default_sort: ("createdAt", Direction::Desc),
};

pub const STATUS_CANCELLED: &str = "cancelled";

///
/// FarmOut
///
/// A batch of garments sent to a subcontractor and tracked until the
/// approved pieces come back.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmOut {
    pub id: RecordId,

    #[serde(default)]
    pub farm_out_number: String,

    #[serde(default)]
    pub subcontractor: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub total_sent: f64,

    #[serde(default)]
    pub total_received: f64,

    #[serde(default)]
    pub total_approved: f64,

    #[serde(default)]
    pub total_rejected: f64,

    #[serde(default)]
    pub total_value: f64,

    /// RFC 3339 deadline for the batch to come back.
    #[serde(default)]
    pub expected_date: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_grade: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FarmOut {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status != STATUS_CANCELLED
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }

    /// Still open after its expected date. An unparseable date never counts.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        if self.is_completed() || !self.is_active() {
            return false;
        }

        DateTime::parse_from_rfc3339(&self.expected_date).is_ok_and(|expected| expected < now)
    }

    /// Approved share of received pieces, in percent. `None` until something
    /// has been received.
    #[must_use]
    pub fn approval_rate(&self) -> Option<f64> {
        (self.total_received > 0.0).then(|| self.total_approved / self.total_received * 100.0)
    }
}

entity_kind!(FarmOut, SCHEMA);
