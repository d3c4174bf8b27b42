//! Metrics sink boundary.
//!
//! Engine code MUST NOT touch `obs::metrics` directly. All instrumentation
//! flows through `MetricsEvent` and `MetricsSink`.
use crate::obs::metrics::{self, EventState};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// DecorateKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecorateKind {
    Primitive,
    Enum,
    Object,
    PassThrough,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    MetadataBuild {
        model_path: &'static str,
        fields: usize,
        virtuals: usize,
    },
    Decorate {
        model_path: &'static str,
        kind: DecorateKind,
    },
    Construct {
        model_path: &'static str,
        fields_populated: u64,
    },
    ReadOnlySkipped {
        model_path: &'static str,
        field: &'static str,
    },
    MarkPristine {
        model_path: &'static str,
    },
    CopyIdentity {
        model_path: &'static str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that folds events into the per-thread counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::MetadataBuild { model_path, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.metadata_builds = m.ops.metadata_builds.saturating_add(1);
                });
                metrics::with_model_mut(model_path, |c| {
                    c.metadata_builds = c.metadata_builds.saturating_add(1);
                });
            }

            MetricsEvent::Decorate { model_path, kind } => {
                metrics::with_state_mut(|m| {
                    let counter = match kind {
                        DecorateKind::Primitive => &mut m.ops.decorate_primitive,
                        DecorateKind::Enum => &mut m.ops.decorate_enum,
                        DecorateKind::Object => &mut m.ops.decorate_object,
                        DecorateKind::PassThrough => &mut m.ops.decorate_pass_through,
                    };
                    *counter = counter.saturating_add(1);
                });
                metrics::with_model_mut(model_path, |c| {
                    c.decorations = c.decorations.saturating_add(1);
                });
            }

            MetricsEvent::Construct {
                model_path,
                fields_populated,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.constructions = m.ops.constructions.saturating_add(1);
                });
                metrics::with_model_mut(model_path, |c| {
                    c.constructions = c.constructions.saturating_add(1);
                    c.fields_populated = c.fields_populated.saturating_add(fields_populated);
                });
            }

            MetricsEvent::ReadOnlySkipped { model_path, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.read_only_skips = m.ops.read_only_skips.saturating_add(1);
                });
                metrics::with_model_mut(model_path, |c| {
                    c.read_only_skips = c.read_only_skips.saturating_add(1);
                });
            }

            MetricsEvent::MarkPristine { model_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.pristine_marks = m.ops.pristine_marks.saturating_add(1);
                });
                metrics::with_model_mut(model_path, |c| {
                    c.pristine_marks = c.pristine_marks.saturating_add(1);
                });
            }

            MetricsEvent::CopyIdentity { model_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.identity_copies = m.ops.identity_copies.saturating_add(1);
                });
                metrics::with_model_mut(model_path, |c| {
                    c.identity_copies = c.identity_copies.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> EventState {
    metrics::with_state(Clone::clone)
}

/// Reset the current thread's metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
/// The previous sink is restored on every exit, including unwind.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
