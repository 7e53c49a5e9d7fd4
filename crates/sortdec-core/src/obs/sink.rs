//! Metrics sink boundary.
//!
//! Codec logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::{codec::CodecErrorKind, obs::metrics};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    Encode { bytes: usize },
    EncodeRejected { kind: CodecErrorKind },
    Decode { bytes: usize, absent: bool },
    DecodeRejected { kind: CodecErrorKind },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| {
            let ops = &mut m.ops;
            match event {
                MetricsEvent::Encode { bytes } => {
                    ops.encode_calls = ops.encode_calls.saturating_add(1);
                    ops.bytes_encoded = ops.bytes_encoded.saturating_add(widen(bytes));
                }
                MetricsEvent::EncodeRejected { kind } => {
                    ops.encode_rejected = ops.encode_rejected.saturating_add(1);
                    ops.record_rejection(kind);
                }
                MetricsEvent::Decode { bytes, absent } => {
                    ops.decode_calls = ops.decode_calls.saturating_add(1);
                    ops.bytes_decoded = ops.bytes_decoded.saturating_add(widen(bytes));
                    if absent {
                        ops.decode_absent = ops.decode_absent.saturating_add(1);
                    }
                }
                MetricsEvent::DecodeRejected { kind } => {
                    ops.decode_rejected = ops.decode_rejected.saturating_add(1);
                    ops.record_rejection(kind);
                }
            }
        });
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a valid `&dyn MetricsSink` in `with_metrics_sink`.
        // - `with_metrics_sink` restores the previous pointer before returning,
        //   including unwind paths via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        // - Only a shared reference is materialized, matching the installing borrow.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current thread's codec metrics.
///
/// `window_start_ms` filters by window start (`EventState::since_ms`),
/// not by per-event timestamps.
#[must_use]
pub fn metrics_report(window_start_ms: Option<u64>) -> metrics::EventReport {
    metrics::report_window_start(window_start_ms)
}

/// Reset all metrics state for the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - `sink_ptr` is installed only for this dynamic scope and `Guard`
    //   restores the previous slot on every exit, including panic.
    // - `record` dereferences synchronously and never persists `sink_ptr`.
    // - The lifetime is erased, but access stays shared-only.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

fn widen(bytes: usize) -> u64 {
    u64::try_from(bytes).unwrap_or(u64::MAX)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CaptureSink {
        events: RefCell<Vec<MetricsEvent>>,
    }

    impl MetricsSink for CaptureSink {
        fn record(&self, event: MetricsEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    #[test]
    fn override_captures_events_and_bypasses_global_state() {
        metrics_reset_all();
        let sink = CaptureSink::default();

        with_metrics_sink(&sink, || {
            record(MetricsEvent::Encode { bytes: 3 });
            record(MetricsEvent::DecodeRejected {
                kind: CodecErrorKind::TooShort,
            });
        });

        assert_eq!(
            sink.events.borrow().as_slice(),
            &[
                MetricsEvent::Encode { bytes: 3 },
                MetricsEvent::DecodeRejected {
                    kind: CodecErrorKind::TooShort
                },
            ]
        );

        let ops = metrics_report(None).counters.expect("counters").ops;
        assert_eq!(ops, metrics::CodecOps::default());
    }

    #[test]
    fn override_is_restored_after_panic() {
        metrics_reset_all();
        let sink = CaptureSink::default();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            with_metrics_sink::<()>(&sink, || panic!("boom"));
        }));
        assert!(outcome.is_err());

        record(MetricsEvent::Encode { bytes: 2 });
        assert!(sink.events.borrow().is_empty());

        let ops = metrics_report(None).counters.expect("counters").ops;
        assert_eq!(ops.encode_calls, 1);
        assert_eq!(ops.bytes_encoded, 2);
    }

    #[test]
    fn global_sink_counts_rejections_by_kind() {
        metrics_reset_all();

        record(MetricsEvent::EncodeRejected {
            kind: CodecErrorKind::MagnitudeTooLarge,
        });
        record(MetricsEvent::DecodeRejected {
            kind: CodecErrorKind::OutOfRange,
        });
        record(MetricsEvent::DecodeRejected {
            kind: CodecErrorKind::LengthMismatch,
        });
        record(MetricsEvent::Decode {
            bytes: 0,
            absent: true,
        });

        let ops = metrics_report(None).counters.expect("counters").ops;
        assert_eq!(ops.encode_rejected, 1);
        assert_eq!(ops.decode_rejected, 2);
        assert_eq!(ops.magnitude_too_large, 1);
        assert_eq!(ops.out_of_range, 1);
        assert_eq!(ops.length_mismatch, 1);
        assert_eq!(ops.decode_calls, 1);
        assert_eq!(ops.decode_absent, 1);
    }

    #[test]
    fn report_with_future_window_is_empty() {
        metrics_reset_all();

        let report = metrics_report(Some(u64::MAX));
        assert!(report.counters.is_none());
    }
}
