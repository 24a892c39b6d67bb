//! Metrics sink boundary.
//!
//! Core DB logic records through `MetricsEvent` and `MetricsSink` only; it
//! never touches counter state directly.

use crate::obs::metrics::{self, EventReport, EventState};
use parking_lot::Mutex;
use std::time::Instant;

///
/// ExecKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecKind {
    Load,
    Query,
    Save,
    Delete,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    ExecStart {
        kind: ExecKind,
        collection: &'a str,
    },
    ExecFinish {
        kind: ExecKind,
        collection: &'a str,
        rows_touched: u64,
        micros: u64,
    },
    RowsScanned {
        collection: &'a str,
        rows_scanned: u64,
    },
    PersistSave {
        bytes: u64,
    },
    PersistFailure,
    PersistLoad {
        restored: bool,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink: Send + Sync {
    fn record(&self, event: MetricsEvent<'_>);

    /// Snapshot of everything recorded so far.
    fn report(&self) -> EventReport {
        EventReport::default()
    }

    fn reset(&self) {}
}

///
/// NoopSink
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn record(&self, _: MetricsEvent<'_>) {}
}

///
/// EventSink
/// Default sink: aggregates counters per operation and per collection.
///

#[derive(Debug, Default)]
pub struct EventSink {
    state: Mutex<EventState>,
}

impl EventSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the raw counter state.
    pub fn with_state<R>(&self, f: impl FnOnce(&EventState) -> R) -> R {
        f(&self.state.lock())
    }
}

impl MetricsSink for EventSink {
    fn record(&self, event: MetricsEvent<'_>) {
        let mut guard = self.state.lock();
        let m = &mut *guard;

        match event {
            MetricsEvent::ExecStart { kind, collection } => {
                let ops = &mut m.ops;
                match kind {
                    ExecKind::Load => ops.load_calls = ops.load_calls.saturating_add(1),
                    ExecKind::Query => ops.query_calls = ops.query_calls.saturating_add(1),
                    ExecKind::Save => ops.save_calls = ops.save_calls.saturating_add(1),
                    ExecKind::Delete => ops.delete_calls = ops.delete_calls.saturating_add(1),
                }

                let entry = m.collection_mut(collection);
                match kind {
                    ExecKind::Load => entry.load_calls = entry.load_calls.saturating_add(1),
                    ExecKind::Query => entry.query_calls = entry.query_calls.saturating_add(1),
                    ExecKind::Save => entry.save_calls = entry.save_calls.saturating_add(1),
                    ExecKind::Delete => {
                        entry.delete_calls = entry.delete_calls.saturating_add(1);
                    }
                }
            }

            MetricsEvent::ExecFinish {
                kind,
                collection,
                rows_touched,
                micros,
            } => {
                let (ops, perf) = (&mut m.ops, &mut m.perf);
                match kind {
                    ExecKind::Load => {
                        ops.rows_loaded = ops.rows_loaded.saturating_add(rows_touched);
                        metrics::add_micros(
                            &mut perf.load_micros_total,
                            &mut perf.load_micros_max,
                            micros,
                        );
                    }
                    ExecKind::Query => {
                        ops.rows_loaded = ops.rows_loaded.saturating_add(rows_touched);
                        metrics::add_micros(
                            &mut perf.query_micros_total,
                            &mut perf.query_micros_max,
                            micros,
                        );
                    }
                    ExecKind::Save => {
                        ops.rows_saved = ops.rows_saved.saturating_add(rows_touched);
                        metrics::add_micros(
                            &mut perf.save_micros_total,
                            &mut perf.save_micros_max,
                            micros,
                        );
                    }
                    ExecKind::Delete => {
                        ops.rows_deleted = ops.rows_deleted.saturating_add(rows_touched);
                        metrics::add_micros(
                            &mut perf.delete_micros_total,
                            &mut perf.delete_micros_max,
                            micros,
                        );
                    }
                }

                let entry = m.collection_mut(collection);
                match kind {
                    ExecKind::Load | ExecKind::Query => {
                        entry.rows_loaded = entry.rows_loaded.saturating_add(rows_touched);
                    }
                    ExecKind::Save => {
                        entry.rows_saved = entry.rows_saved.saturating_add(rows_touched);
                    }
                    ExecKind::Delete => {
                        entry.rows_deleted = entry.rows_deleted.saturating_add(rows_touched);
                    }
                }
            }

            MetricsEvent::RowsScanned {
                collection,
                rows_scanned,
            } => {
                m.ops.rows_scanned = m.ops.rows_scanned.saturating_add(rows_scanned);
                let entry = m.collection_mut(collection);
                entry.rows_scanned = entry.rows_scanned.saturating_add(rows_scanned);
            }

            MetricsEvent::PersistSave { .. } => {
                m.ops.persist_saves = m.ops.persist_saves.saturating_add(1);
            }

            MetricsEvent::PersistFailure => {
                m.ops.persist_failures = m.ops.persist_failures.saturating_add(1);
            }

            MetricsEvent::PersistLoad { restored } => {
                if restored {
                    m.ops.persist_loads = m.ops.persist_loads.saturating_add(1);
                } else {
                    m.ops.persist_rejected = m.ops.persist_rejected.saturating_add(1);
                }
            }
        }
    }

    fn report(&self) -> EventReport {
        EventReport::from(&*self.state.lock())
    }

    fn reset(&self) {
        *self.state.lock() = EventState::default();
    }
}

///
/// Span
/// Guard that emits start/finish events for one entrypoint call.
/// Finish accounting happens on drop, so early returns are still counted.
///

pub struct Span<'a> {
    sink: &'a dyn MetricsSink,
    kind: ExecKind,
    collection: &'a str,
    start: Instant,
    rows: u64,
}

impl<'a> Span<'a> {
    #[must_use]
    pub fn new(sink: &'a dyn MetricsSink, kind: ExecKind, collection: &'a str) -> Self {
        sink.record(MetricsEvent::ExecStart { kind, collection });

        Self {
            sink,
            kind,
            collection,
            start: Instant::now(),
            rows: 0,
        }
    }

    pub const fn set_rows(&mut self, rows: u64) {
        self.rows = rows;
    }
}

impl Drop for Span<'_> {
    fn drop(&mut self) {
        let micros = u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX);

        self.sink.record(MetricsEvent::ExecFinish {
            kind: self.kind,
            collection: self.collection,
            rows_touched: self.rows,
            micros,
        });
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_records_start_and_finish() {
        let sink = EventSink::new();
        {
            let mut span = Span::new(&sink, ExecKind::Delete, "buyers");
            span.set_rows(3);
        }

        sink.with_state(|m| {
            assert_eq!(m.ops.delete_calls, 1);
            assert_eq!(m.ops.rows_deleted, 3);
            assert_eq!(m.collections["buyers"].rows_deleted, 3);
        });
    }

    #[test]
    fn report_orders_collections_by_activity() {
        let sink = EventSink::new();
        drop(Span::new(&sink, ExecKind::Load, "factories"));
        drop(Span::new(&sink, ExecKind::Query, "buyers"));
        drop(Span::new(&sink, ExecKind::Load, "buyers"));

        let report = sink.report();
        let names: Vec<_> = report.collections.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["buyers", "factories"]);
        assert_eq!(report.ops.query_calls, 1);
    }

    #[test]
    fn persistence_events_and_reset() {
        let sink = EventSink::new();
        sink.record(MetricsEvent::PersistSave { bytes: 10 });
        sink.record(MetricsEvent::PersistFailure);
        sink.record(MetricsEvent::PersistLoad { restored: false });

        let report = sink.report();
        assert_eq!(report.ops.persist_saves, 1);
        assert_eq!(report.ops.persist_failures, 1);
        assert_eq!(report.ops.persist_rejected, 1);

        sink.reset();
        assert_eq!(sink.report(), EventReport::default());
    }
}
