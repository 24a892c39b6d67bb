use super::ORDERS;
use erpdb_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(super) const SCHEMA: Schema = Schema {
    collection: ORDERS,
    required: &["buyerId"],
    fields: &[
        FieldSpec::text("orderNumber"),
        FieldSpec::id("buyerId"),
        FieldSpec::text("status"),
        FieldSpec::text("paymentStatus"),
        FieldSpec::number("totalAmount"),
    ],
    search: &["orderNumber", "buyerName", "style"],
    filters: &["status", "paymentStatus", "buyerId", "priority"],
    sort_keys: &[
        SortKey::field("orderNumber"),
        SortKey::field("orderDate"),
        SortKey::field("deliveryDate"),
        SortKey::field("totalAmount"),
        SortKey::field("status"),
        SortKey::field("createdAt"),
    ],
    default_sort: ("createdAt", Direction::Desc),
};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_IN_PRODUCTION: &str = "inProduction";
pub const STATUS_COMPLETED: &str = "completed";

///
/// Order
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: RecordId,

    /// `ORD-YYYY-NNN`, assigned at creation.
    #[serde(default)]
    pub order_number: String,

    pub buyer_id: RecordId,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub payment_status: String,

    #[serde(default)]
    pub total_amount: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

entity_kind!(Order, SCHEMA);
