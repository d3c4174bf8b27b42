use serde::Serialize;
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for engine operations.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub models: BTreeMap<String, ModelCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Metadata cache
    pub metadata_builds: u64,

    // Decoration by declared kind
    pub decorate_primitive: u64,
    pub decorate_enum: u64,
    pub decorate_object: u64,
    pub decorate_pass_through: u64,

    // Lifecycle
    pub constructions: u64,
    pub read_only_skips: u64,
    pub pristine_marks: u64,
    pub identity_copies: u64,
}

///
/// ModelCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ModelCounters {
    pub metadata_builds: u64,
    pub decorations: u64,
    pub constructions: u64,
    pub fields_populated: u64,
    pub read_only_skips: u64,
    pub pristine_marks: u64,
    pub identity_copies: u64,
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

/// Borrow the counters for one model path, creating them on first use.
pub(crate) fn with_model_mut<R>(path: &str, f: impl FnOnce(&mut ModelCounters) -> R) -> R {
    with_state_mut(|m| f(m.models.entry(path.to_string()).or_default()))
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}
