use serde::Serialize;
use std::collections::BTreeMap;

///
/// EventState
/// Ephemeral, in-memory counters and simple timing totals for operations.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventState {
    pub ops: EventOps,
    pub perf: EventPerf,
    pub collections: BTreeMap<String, CollectionCounters>,
}

impl EventState {
    pub(crate) fn collection_mut(&mut self, collection: &str) -> &mut CollectionCounters {
        self.collections.entry(collection.to_string()).or_default()
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOps {
    // Entrypoints
    pub load_calls: u64,
    pub query_calls: u64,
    pub save_calls: u64,
    pub delete_calls: u64,

    // Rows touched
    pub rows_loaded: u64,
    pub rows_scanned: u64,
    pub rows_saved: u64,
    pub rows_deleted: u64,

    // Persistence
    pub persist_saves: u64,
    pub persist_failures: u64,
    pub persist_loads: u64,
    pub persist_rejected: u64,
}

///
/// CollectionCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionCounters {
    pub load_calls: u64,
    pub query_calls: u64,
    pub save_calls: u64,
    pub delete_calls: u64,
    pub rows_loaded: u64,
    pub rows_scanned: u64,
    pub rows_saved: u64,
    pub rows_deleted: u64,
}

///
/// EventPerf
/// Wall-clock microseconds spent per entrypoint kind.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPerf {
    pub load_micros_total: u128,
    pub query_micros_total: u128,
    pub save_micros_total: u128,
    pub delete_micros_total: u128,

    pub load_micros_max: u64,
    pub query_micros_max: u64,
    pub save_micros_max: u64,
    pub delete_micros_max: u64,
}

/// Accumulate a duration and track a max.
pub(crate) fn add_micros(total: &mut u128, max: &mut u64, delta: u64) {
    *total = total.saturating_add(u128::from(delta));
    if delta > *max {
        *max = delta;
    }
}

///
/// EventReport
/// Point-in-time snapshot of a sink's counters.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReport {
    pub ops: EventOps,
    pub perf: EventPerf,

    /// Per-collection counters, busiest collection first.
    pub collections: Vec<(String, CollectionCounters)>,
}

impl From<&EventState> for EventReport {
    fn from(state: &EventState) -> Self {
        let mut collections: Vec<_> = state
            .collections
            .iter()
            .map(|(name, counters)| (name.clone(), counters.clone()))
            .collect();

        collections.sort_by(|(a_name, a), (b_name, b)| {
            let a_calls = a.load_calls + a.query_calls + a.save_calls + a.delete_calls;
            let b_calls = b.load_calls + b.query_calls + b.save_calls + b.delete_calls;

            b_calls.cmp(&a_calls).then_with(|| a_name.cmp(b_name))
        });

        Self {
            ops: state.ops.clone(),
            perf: state.perf.clone(),
            collections,
        }
    }
}
