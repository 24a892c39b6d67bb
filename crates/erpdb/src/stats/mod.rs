//! Domain statistics.
//!
//! Every snapshot is recomputed from the records passed in; nothing here is
//! stored or cached.

mod master;
mod orders;
mod production;
mod quality;

pub use master::{BuyerStats, DecorationStats, FactoryStats, ProductStats};
pub use orders::{OrderRecapStats, OrderStats};
pub use production::{HourlyOutputStats, HourlyProductionStats, ShiftStats};
pub use quality::{FarmOutStats, QcStats};

use serde::Serialize;

///
/// Dashboard
/// Headline statistics for every collection at one point in time.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub buyers: BuyerStats,
    pub factories: FactoryStats,
    pub products: ProductStats,
    pub orders: OrderStats,
    pub decorations: DecorationStats,
    pub order_recap: OrderRecapStats,
    pub hourly_output: HourlyOutputStats,
    pub hourly_production: HourlyProductionStats,
    pub farm_out: FarmOutStats,
    pub qc: QcStats,
}
