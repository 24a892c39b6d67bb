use super::{PRODUCTS, STATUS_ACTIVE};
use erpdb_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(super) const SCHEMA: Schema = Schema {
    collection: PRODUCTS,
    required: &["productName", "category"],
    fields: &[
        FieldSpec::text("productName"),
        FieldSpec::text("productCode"),
        FieldSpec::text("category"),
        FieldSpec::text("status"),
        FieldSpec::number("price"),
        FieldSpec::number("stock"),
        FieldSpec::number("minOrder"),
        FieldSpec::number("totalSold"),
        FieldSpec::number("rating"),
    ],
    search: &["productName", "productCode", "category"],
    filters: &["status", "category"],
    sort_keys: &[
        SortKey::field("productName"),
        SortKey::field("productCode"),
        SortKey::field("category"),
        SortKey::field("price"),
        SortKey::field("stock"),
        SortKey::field("totalSold"),
        SortKey::field("rating"),
        SortKey::field("createdAt"),
    ],
    default_sort: ("createdAt", Direction::Desc),
};

///
/// Product
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: RecordId,

    #[serde(default)]
    pub product_name: String,

    /// `PRE-NNN`, assigned at creation.
    #[serde(default)]
    pub product_code: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub stock: f64,

    #[serde(default)]
    pub min_order: f64,

    #[serde(default)]
    pub total_sold: f64,

    #[serde(default)]
    pub rating: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }

    /// In stock, but no more than one minimum order's worth.
    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        self.stock > 0.0 && self.stock <= self.min_order
    }
}

entity_kind!(Product, SCHEMA);
