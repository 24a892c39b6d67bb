use super::{FACTORIES, STATUS_ACTIVE};
use erpdb_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(super) const SCHEMA: Schema = Schema {
    collection: FACTORIES,
    required: &["factoryName"],
    fields: &[
        FieldSpec::text("factoryName"),
        FieldSpec::text("location"),
        FieldSpec::text("status"),
        FieldSpec::number("capacity"),
        FieldSpec::number("totalProduction"),
        FieldSpec::number("onTimeDelivery"),
        FieldSpec::number("qualityScore"),
        FieldSpec::number("rating"),
    ],
    search: &["factoryName", "location", "contactPerson"],
    filters: &["status", "location"],
    sort_keys: &[
        SortKey::field("factoryName"),
        SortKey::field("location"),
        SortKey::field("capacity"),
        SortKey::field("totalProduction"),
        SortKey::field("onTimeDelivery"),
        SortKey::field("qualityScore"),
        SortKey::field("rating"),
        SortKey::field("createdAt"),
    ],
    default_sort: ("createdAt", Direction::Desc),
};

///
/// Factory
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Factory {
    pub id: RecordId,

    #[serde(default)]
    pub factory_name: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub status: String,

    /// Units per month.
    #[serde(default)]
    pub capacity: f64,

    #[serde(default)]
    pub total_production: f64,

    /// Percentage of orders delivered on time.
    #[serde(default)]
    pub on_time_delivery: f64,

    #[serde(default)]
    pub quality_score: f64,

    #[serde(default)]
    pub rating: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Factory {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

entity_kind!(Factory, SCHEMA);
