//! Core runtime for Ornament: field metadata, the decoration engine, model
//! lifecycle, dirty-state tracking and the persistence surface, plus the
//! ergonomics exported via the `prelude`.
#![warn(unreachable_pub)]

extern crate self as ornament_core;

// public exports are one module level down
pub mod decorate;
pub mod error;
pub mod instance;
pub mod model;
pub mod obs;
pub mod persist;
pub mod state;
pub mod traits;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No registries, sinks or statement renderers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        error::Error,
        instance::{FieldSet, Model},
        model::{ModelBuilder, metadata},
        persist::Adapter,
        traits::{Decorator, DecoratorType, FieldType, ModelEnum, ModelKind, ObjectKind},
        types::DateTime,
        value::Value,
    };
}
