use super::{BUYERS, STATUS_ACTIVE};
use erpdb_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(super) const SCHEMA: Schema = Schema {
    collection: BUYERS,
    required: &["buyerName"],
    fields: &[
        FieldSpec::text("buyerName"),
        FieldSpec::text("contactPerson"),
        FieldSpec::text("email"),
        FieldSpec::text("country"),
        FieldSpec::text("status"),
        FieldSpec::count("totalOrders"),
        FieldSpec::number("totalValue"),
        FieldSpec::number("rating"),
    ],
    search: &["buyerName", "contactPerson", "email", "country"],
    filters: &["status", "country"],
    sort_keys: &[
        SortKey::field("buyerName"),
        SortKey::field("contactPerson"),
        SortKey::field("country"),
        SortKey::field("status"),
        SortKey::field("totalOrders"),
        SortKey::field("totalValue"),
        SortKey::field("rating"),
        SortKey::field("createdAt"),
        SortKey::field("updatedAt"),
    ],
    default_sort: ("createdAt", Direction::Desc),
};

///
/// Buyer
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    pub id: RecordId,

    #[serde(default)]
    pub buyer_name: String,

    #[serde(default)]
    pub contact_person: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub country: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub total_orders: u64,

    #[serde(default)]
    pub total_value: f64,

    #[serde(default)]
    pub rating: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Buyer {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

entity_kind!(Buyer, SCHEMA);
