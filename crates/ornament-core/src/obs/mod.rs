//! Observability: runtime telemetry and sink abstractions.
//!
//! The engine never prints. Every instrumentation point emits a
//! `MetricsEvent`; the default sink folds events into per-thread counters.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventState, ModelCounters};
pub use sink::{
    DecorateKind, MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink,
};
