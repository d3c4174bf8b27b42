use crate::{instance::FieldSet, model::field::FieldModel, value::Value};
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc,
};

/// Backing computation of a virtual property.
pub type Getter = fn(&FieldSet) -> Value;

///
/// ModelMetadata
///
/// Per-model-type table built once from the model's declarations.
/// Never mutated after it is published to the cache.
///

#[derive(Clone)]
pub struct ModelMetadata {
    /// Fully-qualified model path (for dispatch and diagnostics).
    pub path: &'static str,
    /// Stable external name used by persistence adapters.
    pub identifier: String,
    /// Primary key field names, in key order.
    pub primary_key: Vec<&'static str>,

    fields: Vec<Arc<FieldModel>>,
    slots: HashMap<&'static str, usize>,
    decorations: BTreeMap<&'static str, Arc<FieldModel>>,
    virtuals: BTreeMap<&'static str, Getter>,
}

impl ModelMetadata {
    pub(crate) fn new(
        path: &'static str,
        identifier: String,
        primary_key: Vec<&'static str>,
        fields: Vec<FieldModel>,
        virtuals: BTreeMap<&'static str, Getter>,
    ) -> Self {
        let fields: Vec<Arc<FieldModel>> = fields.into_iter().map(Arc::new).collect();

        let slots = fields
            .iter()
            .enumerate()
            .map(|(slot, field)| (field.name, slot))
            .collect();

        let decorations = fields
            .iter()
            .filter(|field| field.is_decorated())
            .map(|field| (field.name, Arc::clone(field)))
            .collect();

        Self {
            path,
            identifier,
            primary_key,
            fields,
            slots,
            decorations,
            virtuals,
        }
    }

    /// All declared fields, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldModel> {
        self.fields.iter().map(AsRef::as_ref)
    }

    #[must_use]
    pub const fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Any declared field, regardless of visibility or decoration.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.slot(name).map(|slot| self.fields[slot].as_ref())
    }

    /// Slot index of a declared field.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<usize> {
        self.slots.get(name).copied()
    }

    pub(crate) fn field_at(&self, slot: usize) -> &FieldModel {
        &self.fields[slot]
    }

    /// Entry of the decoration table: exposed fields that did not opt out.
    #[must_use]
    pub fn decoration(&self, name: &str) -> Option<&Arc<FieldModel>> {
        self.decorations.get(name)
    }

    /// Names in the decoration table, sorted.
    pub fn decorated_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decorations.keys().copied()
    }

    #[must_use]
    pub fn virtual_getter(&self, name: &str) -> Option<Getter> {
        self.virtuals.get(name).copied()
    }

    /// Registered virtual property names, sorted.
    pub fn virtual_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.virtuals.keys().copied()
    }
}

impl fmt::Debug for ModelMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelMetadata")
            .field("path", &self.path)
            .field("identifier", &self.identifier)
            .field("primary_key", &self.primary_key)
            .field("fields", &self.fields)
            .field("virtuals", &self.virtuals.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

// Getters compare by name only; function addresses are not stable.
impl PartialEq for ModelMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.identifier == other.identifier
            && self.primary_key == other.primary_key
            && self.fields == other.fields
            && self.virtuals.keys().eq(other.virtuals.keys())
    }
}
