//! Runtime field metadata.
//!
//! Model kinds declare their shape once, through [`ModelBuilder`]; the
//! resulting [`ModelMetadata`] is cached per concrete model type and is
//! what decoration, access checks and dirty tracking consult at runtime.
//!
//! In general:
//! - `ModelKind::declare` defines *what exists*
//! - `model` defines *what runs*

mod builder;
mod cache;
pub mod enumeration;
pub mod field;
pub mod metadata;

#[cfg(test)]
mod tests;

pub use builder::{FieldBuilder, ModelBuilder};
pub use cache::metadata;
pub use enumeration::{EnumBacking, EnumModel, EnumVariant};
pub use field::{FieldKind, FieldModel, PrimitiveKind, Visibility};
pub use metadata::{Getter, ModelMetadata};
