//! Dirty-state tracking.
//!
//! Each model owns one `Snapshot` of its field values, taken at
//! construction and replaced by `mark_pristine` or `copy_identity_from`.


use crate::{
    instance::{FieldSet, Model},
    obs::sink::{MetricsEvent, record},
    traits::ModelKind,
    value::Value,
};
use derive_more::Deref;

///
/// Snapshot
/// Immutable copy of a model's slots, in declaration order.
///

#[derive(Clone, Debug, Default, Deref, PartialEq)]
pub struct Snapshot(Vec<Option<Value>>);

impl Snapshot {
    pub(crate) fn capture(fields: &FieldSet) -> Self {
        Self(fields.slots().to_vec())
    }

    /// Captured value of a slot; `None` when it was uninitialised.
    #[must_use]
    pub fn slot_value(&self, slot: usize) -> Option<&Value> {
        self.0.get(slot).and_then(Option::as_ref)
    }
}

// Absent = uninitialised or Null. Absent on both sides is unmodified,
// absent on one side is modified, otherwise compare by value. Floats
// compare bitwise so a stored NaN equals its own snapshot.
fn differs(current: Option<&Value>, initial: Option<&Value>) -> bool {
    let current = current.filter(|v| !v.is_absent());
    let initial = initial.filter(|v| !v.is_absent());

    match (current, initial) {
        (None, None) => false,
        (Some(Value::Float(a)), Some(Value::Float(b))) => a.to_bits() != b.to_bits(),
        (Some(a), Some(b)) => a != b,
        _ => true,
    }
}

impl<M: ModelKind> Model<M> {
    /// Whether `name` differs from its snapshot value. Unknown names are
    /// never modified.
    #[must_use]
    pub fn is_modified(&self, name: &str) -> bool {
        self.metadata()
            .slot(name)
            .is_some_and(|slot| self.slot_modified(slot))
    }

    /// Whether any exposed field is modified.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.metadata()
            .fields()
            .enumerate()
            .any(|(slot, field)| field.is_exposed() && self.slot_modified(slot))
    }

    #[must_use]
    pub fn is_pristine(&self) -> bool {
        !self.is_dirty()
    }

    /// Exposed modified fields, in declaration order.
    #[must_use]
    pub fn modified_fields(&self) -> Vec<&'static str> {
        self.metadata()
            .fields()
            .enumerate()
            .filter(|(slot, field)| field.is_exposed() && self.slot_modified(*slot))
            .map(|(_, field)| field.name)
            .collect()
    }

    /// Take a new snapshot of the current values. Values are not touched.
    pub fn mark_pristine(&mut self) {
        self.initial = Snapshot::capture(&self.fields);

        record(MetricsEvent::MarkPristine {
            model_path: M::PATH,
        });
    }

    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.initial
    }

    fn slot_modified(&self, slot: usize) -> bool {
        differs(self.fields.slot_value(slot), self.initial.slot_value(slot))
    }
}
