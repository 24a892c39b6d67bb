use super::{DECORATIONS, STATUS_ACTIVE};
use erpdb_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(super) const SCHEMA: Schema = Schema {
    collection: DECORATIONS,
    required: &["decorationName", "decorationType"],
    fields: &[
        FieldSpec::text("decorationName"),
        FieldSpec::text("decorationType"),
        FieldSpec::text("category"),
        FieldSpec::text("complexity"),
        FieldSpec::text("status"),
        FieldSpec::number("setupTime"),
        FieldSpec::number("costPerUnit"),
        FieldSpec::count("totalJobs"),
        FieldSpec::number("rating"),
    ],
    search: &["decorationName", "decorationType", "category"],
    filters: &["status", "decorationType", "category", "complexity"],
    sort_keys: &[
        SortKey::field("decorationName"),
        SortKey::field("decorationType"),
        SortKey::field("setupTime"),
        SortKey::field("costPerUnit"),
        SortKey::field("totalJobs"),
        SortKey::field("rating"),
        SortKey::field("createdAt"),
    ],
    default_sort: ("createdAt", Direction::Desc),
};

pub const COMPLEXITY_HIGH: &str = "High";

///
/// Decoration
///
/// A decoration technique offered to buyers (embroidery, print, patch).
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    pub id: RecordId,

    #[serde(default)]
    pub decoration_name: String,

    #[serde(default)]
    pub decoration_type: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub complexity: String,

    #[serde(default)]
    pub status: String,

    /// Minutes.
    #[serde(default)]
    pub setup_time: f64,

    #[serde(default)]
    pub cost_per_unit: f64,

    #[serde(default)]
    pub total_jobs: u64,

    #[serde(default)]
    pub rating: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Decoration {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }

    #[must_use]
    pub fn is_high_complexity(&self) -> bool {
        self.complexity == COMPLEXITY_HIGH
    }
}

entity_kind!(Decoration, SCHEMA);
