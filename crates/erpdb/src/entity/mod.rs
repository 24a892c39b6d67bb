//! Typed views over every ERP collection.
//!
//! Each entity keeps the fields the domain layer reads as typed members and
//! carries everything else in a flattened `extra` map, so records written by
//! other clients survive a decode/encode cycle unchanged.

// Implements `EntityKind` for a struct with an `id: RecordId` member.
macro_rules! entity_kind {
    ($entity:ty, $schema:path) => {
        impl ::erpdb_core::traits::EntityKind for $entity {
            const SCHEMA: &'static ::erpdb_core::schema::Schema = &$schema;

            fn id(&self) -> &::erpdb_core::types::RecordId {
                &self.id
            }
        }
    };
}

mod buyer;
mod decoration;
mod factory;
mod farm_out;
mod hourly_output;
mod hourly_production;
mod order;
mod order_recap;
mod product;
mod qc_inspection;

pub use buyer::Buyer;
pub use decoration::{COMPLEXITY_HIGH, Decoration};
pub use factory::Factory;
pub use farm_out::{FarmOut, STATUS_CANCELLED};
pub use hourly_output::{HourlyOutputReport, SHIFT_DAY, SHIFT_NIGHT};
pub use hourly_production::{HourlyProduction, ProductionTotal};
pub use order::{Order, STATUS_COMPLETED, STATUS_IN_PRODUCTION, STATUS_PENDING};
pub use order_recap::OrderRecap;
pub use product::Product;
pub use qc_inspection::{QC_FAILED, QC_PASSED, QC_REWORK, QcInspection};

use erpdb_core::schema::Schema;

///
/// Collection names
///

pub const BUYERS: &str = "buyers";
pub const FACTORIES: &str = "factories";
pub const PRODUCTS: &str = "products";
pub const ORDERS: &str = "orders";
pub const DECORATIONS: &str = "decorations";
pub const ORDER_RECAP: &str = "orderRecap";
pub const HOURLY_OUTPUT_REPORT: &str = "hourlyOutputReport";
pub const HOURLY_PRODUCTION: &str = "hourlyProduction";
pub const FARM_OUT: &str = "farmOut";
pub const QC_INSPECTIONS: &str = "qcInspections";

/// Value of `status` for records in use.
pub const STATUS_ACTIVE: &str = "active";

/// Value of `status` for records taken out of use.
pub const STATUS_INACTIVE: &str = "inactive";

/// Schemas for every ERP collection, in seed order.
pub const SCHEMAS: [&Schema; 10] = [
    &buyer::SCHEMA,
    &factory::SCHEMA,
    &product::SCHEMA,
    &order::SCHEMA,
    &decoration::SCHEMA,
    &order_recap::SCHEMA,
    &hourly_output::SCHEMA,
    &hourly_production::SCHEMA,
    &farm_out::SCHEMA,
    &qc_inspection::SCHEMA,
];
