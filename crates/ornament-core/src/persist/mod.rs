//! Persistence surface.
//!
//! What a storage adapter needs from a model: a flat row of persistable
//! values, the primary key, and a way to adopt the identity of a stored
//! copy. `sql` renders the statements a relational adapter would prepare;
//! `MemoryAdapter` runs the same lifecycle against an in-process table.

mod adapter;
pub mod sql;


pub use adapter::{Adapter, MemoryAdapter};
pub use sql::{QueryOptions, Statement};

use crate::{
    error::Error,
    instance::Model,
    obs::sink::{MetricsEvent, record},
    traits::ModelKind,
    value::Value,
};

/// Flat `(field, value)` row, in declaration order.
pub type Row = Vec<(&'static str, Value)>;

impl<M: ModelKind> Model<M> {
    /// Public, non-read-only fields, followed by the named `extra` fields.
    ///
    /// Extras may name fields of any visibility or virtual properties; they
    /// are how non-public state reaches storage. Absent values are reported
    /// as `Null`.
    pub fn persistable_data(&self, extra: &[&str]) -> Result<Row, Error> {
        let meta = self.metadata();

        let mut row: Row = self
            .fields
            .iter()
            .filter(|(field, _)| field.is_persistable())
            .map(|(field, value)| (field.name, value.cloned().unwrap_or(Value::Null)))
            .collect();

        for &name in extra {
            if row.iter().any(|(n, _)| *n == name) {
                continue;
            }

            if let Some(field) = meta.field(name) {
                row.push((field.name, self.fields.value_or_null(name)));
            } else if let Some(getter) = meta.virtual_getter(name) {
                let name = meta
                    .virtual_names()
                    .find(|v| *v == name)
                    .ok_or_else(|| Error::unknown_field(meta.path, name))?;
                row.push((name, getter(&self.fields)));
            } else {
                return Err(Error::unknown_field(meta.path, name));
            }
        }

        Ok(row)
    }

    /// Primary key values, in key order. Fails when any key field is
    /// absent.
    pub fn primary_key_values(&self) -> Result<Row, Error> {
        let meta = self.metadata();

        meta.primary_key
            .iter()
            .map(|&name| {
                let field = meta
                    .field(name)
                    .ok_or_else(|| Error::unknown_field(meta.path, name))?;

                match self.fields.value(name) {
                    Some(value) if !value.is_absent() => Ok((field.name, value.clone())),
                    _ => Err(Error::MissingPrimaryKey {
                        model: meta.path,
                        field: name.to_string(),
                    }),
                }
            })
            .collect()
    }

    /// Replace every field and the snapshot with those of `other`.
    ///
    /// Used after an insert: the stored copy carries the generated
    /// identifier, and the caller's model adopts it wholesale.
    pub fn copy_identity_from(&mut self, other: &Self) {
        self.fields = other.fields.clone();
        self.initial = other.initial.clone();

        record(MetricsEvent::CopyIdentity {
            model_path: M::PATH,
        });
    }
}
