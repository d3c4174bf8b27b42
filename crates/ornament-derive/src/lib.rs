//! Derive macros generating `ModelKind` and `ModelEnum` declarations.
//!
//! The macros only emit a `declare` body (or a static enum table); all
//! behaviour lives in `ornament-core`.

use proc_macro::TokenStream;

mod model;
mod model_enum;
mod paths;
mod util;

/// Derive `ModelKind` for a struct with named fields.
///
/// Struct attribute: `#[model(path = "..", identifier = "..",
/// primary_key = "a, b", getter(name = "..", with = "path::to::fn"))]`.
/// Field attribute: `#[field(read_only, protected, private, no_decoration,
/// enumeration, object, default = <lit>, construct = <lit>)]`.
#[proc_macro_derive(Model, attributes(model, field))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive_model(input.into()).into()
}

/// Derive `ModelEnum` for a unit-only enum.
///
/// Enum attribute: `#[model_enum(path = "..")]`. Variant attribute:
/// `#[variant(value = "text" | <int>)]`; the default backing is the
/// variant name as text.
#[proc_macro_derive(ModelEnum, attributes(model_enum, variant))]
pub fn derive_model_enum(input: TokenStream) -> TokenStream {
    model_enum::derive_model_enum(input.into()).into()
}
