use crate::codec::CodecErrorKind;
use serde::{Deserialize, Serialize};
use std::{
    cell::RefCell,
    time::{SystemTime, UNIX_EPOCH},
};

///
/// EventState
/// Ephemeral, in-memory codec counters for the current thread.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventState {
    pub ops: CodecOps,
    pub since_ms: u64,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: CodecOps::default(),
            since_ms: now_millis(),
        }
    }
}

///
/// CodecOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CodecOps {
    // Successful calls
    pub encode_calls: u64,
    pub decode_calls: u64,
    pub decode_absent: u64,

    // Bytes produced / consumed by successful calls
    pub bytes_encoded: u64,
    pub bytes_decoded: u64,

    // Rejections
    pub encode_rejected: u64,
    pub decode_rejected: u64,
    pub magnitude_too_large: u64,
    pub too_short: u64,
    pub length_mismatch: u64,
    pub out_of_range: u64,
    pub buffer_too_small: u64,
}

impl CodecOps {
    pub(crate) const fn record_rejection(&mut self, kind: CodecErrorKind) {
        let slot = match kind {
            CodecErrorKind::MagnitudeTooLarge => &mut self.magnitude_too_large,
            CodecErrorKind::TooShort => &mut self.too_short,
            CodecErrorKind::LengthMismatch => &mut self.length_mismatch,
            CodecErrorKind::OutOfRange => &mut self.out_of_range,
            CodecErrorKind::BufferTooSmall => &mut self.buffer_too_small,
        };
        *slot = slot.saturating_add(1);
    }
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    /// Ephemeral runtime counters since `since_ms`.
    pub counters: Option<EventState>,
}

/// Build a report, dropping counters whose window started before `window_start_ms`.
pub(crate) fn report_window_start(window_start_ms: Option<u64>) -> EventReport {
    let snapshot = with_state(Clone::clone);

    if let Some(requested) = window_start_ms
        && requested > snapshot.since_ms
    {
        return EventReport::default();
    }

    EventReport {
        counters: Some(snapshot),
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}
