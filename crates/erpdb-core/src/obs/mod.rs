//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Sinks are owned by the `Db` instance that records into them; there is no
//! process-global metrics state.

pub mod metrics;
pub mod sink;

// re-exports
pub use metrics::{CollectionCounters, EventOps, EventPerf, EventReport, EventState};
pub use sink::{EventSink, ExecKind, MetricsEvent, MetricsSink, NoopSink, Span};
