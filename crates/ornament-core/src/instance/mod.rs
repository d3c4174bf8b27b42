//! Model lifecycle.
//!
//! A `Model<M>` owns the live values of every declared field of `M` plus the
//! snapshot used for dirty tracking. Values are stored in declaration order;
//! a `None` slot is a field that was never initialised.


use crate::{
    decorate::decorate_field,
    error::{AccessOp, AccessViolation, Error},
    model::{FieldModel, ModelMetadata, metadata},
    obs::sink::{MetricsEvent, record},
    state::Snapshot,
    traits::ModelKind,
    value::Value,
};
use std::{collections::HashMap, fmt, marker::PhantomData, sync::Arc};

///
/// FieldSet
///
/// The stored values of one model instance, regardless of visibility.
/// Virtual getters receive a `&FieldSet`, so they can compute from private
/// state the generic getter would refuse to expose.
///

#[derive(Clone)]
pub struct FieldSet {
    meta: Arc<ModelMetadata>,
    slots: Vec<Option<Value>>,
}

impl FieldSet {
    pub(crate) fn defaults(meta: Arc<ModelMetadata>) -> Self {
        let slots = meta
            .fields()
            .map(|field| field.default.clone().map(|value| field.admit(value)))
            .collect();

        Self { meta, slots }
    }

    #[must_use]
    pub fn metadata(&self) -> &ModelMetadata {
        &self.meta
    }

    /// Stored value of any declared field. `None` when the field is unknown
    /// or was never initialised.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.meta.slot(name).and_then(|slot| self.slot_value(slot))
    }

    /// Like `value`, with absence reported as `Null`.
    #[must_use]
    pub fn value_or_null(&self, name: &str) -> Value {
        self.value(name).cloned().unwrap_or(Value::Null)
    }

    /// Whether the field has been initialised (possibly to `Null`).
    #[must_use]
    pub fn is_initialised(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    /// Declared fields with their stored values, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldModel, Option<&Value>)> {
        self.meta.fields().zip(self.slots.iter().map(Option::as_ref))
    }

    pub(crate) fn slot_value(&self, slot: usize) -> Option<&Value> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub(crate) fn slots(&self) -> &[Option<Value>] {
        &self.slots
    }

    pub(crate) fn store(&mut self, slot: usize, value: Value) {
        let value = self.meta.field_at(slot).admit(value);
        self.slots[slot] = Some(value);
    }
}

impl fmt::Debug for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (field, value) in self.iter() {
            map.entry(&field.name, &value);
        }
        map.finish()
    }
}

impl PartialEq for FieldSet {
    fn eq(&self, other: &Self) -> bool {
        self.meta.path == other.meta.path && self.slots == other.slots
    }
}

///
/// Model
///
/// A live instance of model kind `M`.
///

pub struct Model<M: ModelKind> {
    pub(crate) fields: FieldSet,
    pub(crate) initial: Snapshot,
    kind: PhantomData<fn() -> M>,
}

impl<M: ModelKind> Model<M> {
    /// A model holding only its declared defaults. No decoration runs.
    #[must_use]
    pub fn new() -> Self {
        let model = Self::blank();

        record(MetricsEvent::Construct {
            model_path: M::PATH,
            fields_populated: 0,
        });

        model
    }

    /// Construct from a keyed input row.
    ///
    /// Every decorated field present in `input` is decorated and stored;
    /// names that are not decorated fields are ignored. The snapshot is
    /// taken once all fields are applied.
    pub fn from_input<K, V>(input: impl IntoIterator<Item = (K, V)>) -> Result<Self, Error>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut model = Self::blank();
        let populated = model.apply(input)?;
        model.initial = Snapshot::capture(&model.fields);

        record(MetricsEvent::Construct {
            model_path: M::PATH,
            fields_populated: populated,
        });

        Ok(model)
    }

    /// Alias of `from_input`, convenient as a mapping callback.
    pub fn from_iterable<K, V>(row: impl IntoIterator<Item = (K, V)>) -> Result<Self, Error>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::from_input(row)
    }

    /// Construct one model per row, preserving row order.
    pub fn from_iterable_collection<R, K, V>(
        rows: impl IntoIterator<Item = R>,
    ) -> Result<Vec<Self>, Error>
    where
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        rows.into_iter().map(Self::from_iterable).collect()
    }

    /// Apply a fetched row to an existing model without touching its
    /// snapshot. Read-only fields that already hold a value are skipped.
    pub fn populate<K, V>(&mut self, input: impl IntoIterator<Item = (K, V)>) -> Result<(), Error>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.apply(input).map(|_| ())
    }

    /// Read an exposed field or a virtual property.
    ///
    /// Virtual properties are computed from the current values and are
    /// never decorated. Uninitialised fields read as `Null`.
    pub fn get(&self, name: &str) -> Result<Value, Error> {
        let meta = self.fields.metadata();

        if let Some(getter) = meta.virtual_getter(name) {
            return Ok(getter(&self.fields));
        }

        let field = meta.field(name).ok_or_else(|| {
            Error::access(meta.path, name, AccessOp::Get, AccessViolation::Undeclared)
        })?;
        if !field.is_exposed() {
            return Err(Error::access(
                meta.path,
                name,
                AccessOp::Get,
                AccessViolation::NotExposed,
            ));
        }

        Ok(self.fields.value_or_null(name))
    }

    /// Decorate `raw` and store it in a public, writable field.
    pub fn set(&mut self, name: &str, raw: impl Into<Value>) -> Result<(), Error> {
        let slot = self.writable_slot(name)?;
        let value = decorate_field(self.fields.metadata(), name, raw.into())?;
        self.fields.store(slot, value);

        Ok(())
    }

    /// Store `value` as given: the same access rules as `set`, without
    /// decoration.
    pub fn assign(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        let slot = self.writable_slot(name)?;
        self.fields.store(slot, value.into());

        Ok(())
    }

    /// True for virtual properties, and for exposed fields holding a
    /// non-null value. Never fails.
    #[must_use]
    pub fn isset(&self, name: &str) -> bool {
        let meta = self.fields.metadata();
        if meta.virtual_getter(name).is_some() {
            return true;
        }

        meta.field(name).is_some_and(FieldModel::is_exposed)
            && self.fields.value(name).is_some_and(|v| !v.is_absent())
    }

    #[must_use]
    pub const fn fields(&self) -> &FieldSet {
        &self.fields
    }

    #[must_use]
    pub fn metadata(&self) -> &ModelMetadata {
        self.fields.metadata()
    }

    fn blank() -> Self {
        let fields = FieldSet::defaults(metadata::<M>());
        let initial = Snapshot::capture(&fields);

        Self {
            fields,
            initial,
            kind: PhantomData,
        }
    }

    // bulk population: decorated fields in declaration order
    fn apply<K, V>(&mut self, input: impl IntoIterator<Item = (K, V)>) -> Result<u64, Error>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut input: HashMap<String, Value> = input
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if input.is_empty() {
            return Ok(0);
        }

        let meta = Arc::clone(&self.fields.meta);
        let mut populated = 0u64;

        for (slot, field) in meta.fields().enumerate() {
            if !field.is_decorated() {
                continue;
            }
            let Some(raw) = input.remove(field.name) else {
                continue;
            };

            if field.read_only && self.fields.slot_value(slot).is_some() {
                record(MetricsEvent::ReadOnlySkipped {
                    model_path: meta.path,
                    field: field.name,
                });
                continue;
            }

            let value = decorate_field(&meta, field.name, raw)?;
            self.fields.store(slot, value);
            populated += 1;
        }

        Ok(populated)
    }

    fn writable_slot(&self, name: &str) -> Result<usize, Error> {
        let meta = self.fields.metadata();
        let deny = |reason| Error::access(meta.path, name, AccessOp::Set, reason);

        if meta.virtual_getter(name).is_some() {
            return Err(deny(AccessViolation::Virtual));
        }
        let slot = meta
            .slot(name)
            .ok_or_else(|| deny(AccessViolation::Undeclared))?;

        let field = meta.field_at(slot);
        if !field.is_public() {
            return Err(deny(AccessViolation::NotPublic));
        }
        if field.read_only {
            return Err(deny(AccessViolation::ReadOnly));
        }

        Ok(slot)
    }
}

impl<M: ModelKind> Clone for Model<M> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            initial: self.initial.clone(),
            kind: PhantomData,
        }
    }
}

impl<M: ModelKind> Default for Model<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ModelKind> fmt::Debug for Model<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("path", &M::PATH)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

// Equality is over live values only; snapshots are bookkeeping.
impl<M: ModelKind> PartialEq for Model<M> {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}
