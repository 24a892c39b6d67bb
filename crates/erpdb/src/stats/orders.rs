use crate::entity::{Order, OrderRecap, STATUS_COMPLETED, STATUS_IN_PRODUCTION, STATUS_PENDING};
use erpdb_core::db::aggregate::{average_by, count_where, distinct_count, round_to, sum_by};
use serde::Serialize;

///
/// OrderStats
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub total: usize,
    pub pending: usize,
    pub in_production: usize,
    pub completed: usize,
    pub total_value: f64,

    /// Two decimal places.
    pub average_order_value: f64,
}

impl OrderStats {
    #[must_use]
    pub fn compute(orders: &[Order]) -> Self {
        Self {
            total: orders.len(),
            pending: count_where(orders, |o| o.status == STATUS_PENDING),
            in_production: count_where(orders, |o| o.status == STATUS_IN_PRODUCTION),
            completed: count_where(orders, |o| o.status == STATUS_COMPLETED),
            total_value: sum_by(orders, |o| o.total_amount),
            average_order_value: round_to(average_by(orders, |o| o.total_amount), 2),
        }
    }
}

///
/// OrderRecapStats
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecapStats {
    pub total_orders: usize,
    pub total_quantity: f64,
    pub total_amount: f64,

    /// Three decimal places.
    pub average_price: f64,

    /// Distinct buyer names.
    pub buyers: usize,

    /// Distinct factory names.
    pub factories: usize,

    #[serde(rename = "pendingQC")]
    pub pending_qc: usize,

    #[serde(rename = "completedQC")]
    pub completed_qc: usize,
}

impl OrderRecapStats {
    #[must_use]
    pub fn compute(recaps: &[OrderRecap]) -> Self {
        let pending_qc = count_where(recaps, OrderRecap::is_qc_pending);

        Self {
            total_orders: recaps.len(),
            total_quantity: sum_by(recaps, |r| r.order_quantity),
            total_amount: sum_by(recaps, |r| r.amount),
            average_price: round_to(average_by(recaps, |r| r.price), 3),
            buyers: distinct_count(recaps, |r| r.buyer.as_str()),
            factories: distinct_count(recaps, |r| r.factory.as_str()),
            pending_qc,
            completed_qc: recaps.len() - pending_qc,
        }
    }
}

///
/// TESTS
///
