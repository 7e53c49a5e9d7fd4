//! Observability: codec telemetry (metrics) and sink abstractions.
//!
//! The codec never touches `metrics` state directly; every call reports
//! through `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{CodecOps, EventReport, EventState};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
