//! Decoration engine.
//!
//! Turns raw input values into the declared shape of a field. Decoration
//! is pure given `(model type, field, value)`: it never assigns, and the
//! only shared state it touches is the metadata cache and object registry.

mod args;
mod registry;


pub use args::ConstructArgs;
pub use registry::{is_registered, register_object};

use crate::{
    error::Error,
    model::{EnumModel, FieldKind, FieldModel, ModelMetadata, metadata},
    obs::sink::{DecorateKind, MetricsEvent, record},
    traits::{ModelKind, ObjectKind},
    value::Value,
};
use std::sync::Arc;

/// Decorate `raw` for `field` on model kind `M`.
pub fn decorate<M: ModelKind>(field: &str, raw: impl Into<Value>) -> Result<Value, Error> {
    decorate_field(&metadata::<M>(), field, raw.into())
}

/// Decorate `raw` for `field` against an already resolved table.
///
/// Declared fields that opted out of decoration pass through unchanged;
/// any other name missing from the decoration table is an unknown field.
pub fn decorate_field(meta: &ModelMetadata, field: &str, raw: Value) -> Result<Value, Error> {
    match meta.decoration(field) {
        Some(decl) => ornamentalize(meta.path, decl, raw),
        None => match meta.field(field) {
            Some(decl) if !decl.decorate => {
                record(MetricsEvent::Decorate {
                    model_path: meta.path,
                    kind: DecorateKind::PassThrough,
                });

                Ok(raw)
            }
            _ => Err(Error::unknown_field(meta.path, field)),
        },
    }
}

// ornamentalize
// applies the declared kind of one decorated field
pub(crate) fn ornamentalize(
    model: &'static str,
    field: &Arc<FieldModel>,
    raw: Value,
) -> Result<Value, Error> {
    let (kind, value) = match field.kind {
        FieldKind::Primitive(_) => (DecorateKind::Primitive, decode_primitive(field, raw)),
        FieldKind::Enum(model_enum) => (
            DecorateKind::Enum,
            decode_enum(model, field, model_enum, raw)?,
        ),
        FieldKind::Object(path) => (
            DecorateKind::Object,
            construct_object(model, field, path, raw)?,
        ),
        FieldKind::Untyped => (DecorateKind::PassThrough, raw),
    };

    record(MetricsEvent::Decorate {
        model_path: model,
        kind,
    });

    Ok(value)
}

// Primitives are never coerced; nullable fields only collapse empty
// scalars to Null.
fn decode_primitive(field: &FieldModel, raw: Value) -> Value {
    if field.nullable && raw.is_empty_scalar() {
        Value::Null
    } else {
        raw
    }
}

fn decode_enum(
    model: &'static str,
    field: &FieldModel,
    model_enum: &'static EnumModel,
    raw: Value,
) -> Result<Value, Error> {
    if let Value::Enum(decoded) = &raw
        && decoded.path == model_enum.path
    {
        return Ok(raw);
    }

    match model_enum.parse(&raw) {
        Some(decoded) => Ok(Value::Enum(decoded)),
        None if field.nullable => Ok(Value::Null),
        None => Err(Error::EnumDecode {
            model,
            field: field.name.to_string(),
            path: model_enum.path,
            value: raw.to_string(),
        }),
    }
}

fn construct_object(
    model: &'static str,
    field: &Arc<FieldModel>,
    path: &'static str,
    raw: Value,
) -> Result<Value, Error> {
    if field.nullable && raw.is_null() {
        return Ok(Value::Null);
    }
    if let Value::Object(object) = &raw
        && object.path() == path
    {
        return Ok(raw);
    }

    let entry = registry::resolve(path).ok_or_else(|| Error::UnknownDecoratorType {
        model,
        field: field.name.to_string(),
        ty: path,
    })?;

    let mut args = ConstructArgs::new(raw);
    if entry.kind == ObjectKind::Decorator {
        args = args.with_field(Arc::clone(field));
    }
    args = args.with_extra(field.construct_args.iter().cloned());

    let object = (entry.construct)(args).map_err(|source| Error::Construct {
        model,
        field: field.name.to_string(),
        ty: path,
        source,
    })?;

    Ok(Value::Object(object))
}
