//! Seed data shipped with the crate. Used as the defaults every `Erp`
//! instance falls back to, and restored by `reset`.

use crate::entity::{
    BUYERS, DECORATIONS, FACTORIES, FARM_OUT, HOURLY_OUTPUT_REPORT, HOURLY_PRODUCTION,
    ORDER_RECAP, ORDERS, PRODUCTS, QC_INSPECTIONS,
};
use erpdb_core::{db::store::RecordStore, error::InternalError, record::Record, serialize};
use std::collections::BTreeMap;

const SEEDS: [(&str, &str); 10] = [
    (BUYERS, include_str!("../data/buyers.json")),
    (FACTORIES, include_str!("../data/factories.json")),
    (PRODUCTS, include_str!("../data/products.json")),
    (ORDERS, include_str!("../data/orders.json")),
    (DECORATIONS, include_str!("../data/decorations.json")),
    (ORDER_RECAP, include_str!("../data/orderRecap.json")),
    (HOURLY_OUTPUT_REPORT, include_str!("../data/hourlyOutputReport.json")),
    (HOURLY_PRODUCTION, include_str!("../data/hourlyProduction.json")),
    (FARM_OUT, include_str!("../data/farmOut.json")),
    (QC_INSPECTIONS, include_str!("../data/qcInspections.json")),
];

/// Decode the embedded seed collections.
pub fn default_collections() -> Result<RecordStore, InternalError> {
    let mut collections = BTreeMap::new();
    for (name, text) in SEEDS {
        let records: Vec<Record> = serialize::deserialize(text)?;
        collections.insert(name.to_string(), records);
    }

    RecordStore::from_collections(collections)
}

///
/// TESTS
///
