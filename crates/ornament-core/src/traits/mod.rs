mod field_type;

pub use field_type::FieldType;

// -----------------------------------------------------------------------------
// Standard re-exports for `traits::X` ergonomics
// -----------------------------------------------------------------------------

pub use serde::Serialize;
pub use std::{any::Any, fmt::Debug};

use crate::{
    decorate::ConstructArgs,
    error::ConstructError,
    model::{EnumModel, ModelBuilder},
    value::Value,
};

// ============================================================================
// MODEL KINDS
// ============================================================================
//
// These traits describe *what a model is*; instances live in
// `instance::Model<M>`.
//

///
/// ModelKind
///
/// A model type. `declare` lists the model's fields, virtual properties and
/// persistence identity; it runs once per process for each concrete type.
///

pub trait ModelKind: 'static {
    const PATH: &'static str;

    fn declare(model: &mut ModelBuilder);
}

///
/// ModelEnum
///
/// A Rust enum usable as a field type. Decoding matches raw values against
/// `MODEL`'s backings.
///

pub trait ModelEnum: Sized + 'static {
    const MODEL: &'static EnumModel;

    fn from_variant(variant: &str) -> Option<Self>;

    fn variant(&self) -> &'static str;
}

// ============================================================================
// OBJECT TYPES
// ============================================================================

///
/// ObjectKind
///
/// Decorators receive a back-reference to the field that produced them;
/// plain objects are constructed from the value and extra arguments only.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ObjectKind {
    Decorator,
    Plain,
}

///
/// Decorator
///
/// Runtime behaviour of a constructed object value. `source` is the raw
/// input; `value` is the representation derived from it, which decorators
/// are free to compute however they like.
///

pub trait Decorator: Debug + Send + Sync + 'static {
    fn path(&self) -> &'static str;

    fn source(&self) -> &Value;

    fn value(&self) -> Value {
        self.source().clone()
    }

    fn render(&self) -> String {
        self.value().to_string()
    }

    fn as_any(&self) -> &dyn Any;
}

///
/// DecoratorType
/// A constructible object type that can be registered by path.
///

pub trait DecoratorType: Decorator + Sized {
    const PATH: &'static str;
    const KIND: ObjectKind;

    fn construct(args: ConstructArgs) -> Result<Self, ConstructError>;
}
