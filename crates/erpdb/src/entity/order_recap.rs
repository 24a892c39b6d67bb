use super::ORDER_RECAP;
use erpdb_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(super) const SCHEMA: Schema = Schema {
    collection: ORDER_RECAP,
    required: &["buyer", "factory"],
    fields: &[
        FieldSpec::text("buyer"),
        FieldSpec::text("factory"),
        FieldSpec::number("orderQuantity"),
        FieldSpec::number("price"),
        FieldSpec::number("amount"),
        FieldSpec::text("firstQC").nullable(),
    ],
    search: &["buyer", "factory", "style", "color"],
    filters: &["buyer", "factory"],
    sort_keys: &[
        SortKey::field("buyer"),
        SortKey::field("factory"),
        SortKey::field("orderQuantity"),
        SortKey::field("price"),
        SortKey::field("amount"),
        SortKey::field("deliveryDate"),
        SortKey::field("createdAt"),
    ],
    default_sort: ("createdAt", Direction::Desc),
};

///
/// OrderRecap
///
/// One style/colour line of a buyer's order as placed with a factory.
/// `buyer` and `factory` hold display names, not ids.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecap {
    pub id: RecordId,

    #[serde(default)]
    pub buyer: String,

    #[serde(default)]
    pub factory: String,

    #[serde(default)]
    pub order_quantity: f64,

    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub amount: f64,

    /// Date of the first quality check; empty or missing until it happens.
    #[serde(default, rename = "firstQC", skip_serializing_if = "Option::is_none")]
    pub first_qc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderRecap {
    #[must_use]
    pub fn is_qc_pending(&self) -> bool {
        self.first_qc.as_deref().is_none_or(str::is_empty)
    }
}

entity_kind!(OrderRecap, SCHEMA);
