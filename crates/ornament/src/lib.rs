//! ## Crate layout
//! - `core`: field metadata, the decoration engine, model lifecycle,
//!   dirty-state tracking, persistence and observability.
//! - `Model` / `ModelEnum`: derive macros that generate declarations.
//!
//! The `prelude` module covers what model code needs day to day; the
//! registries, metrics sinks and statement renderers stay under `core`.

pub use ornament_core as core;
pub use ornament_derive::{Model, ModelEnum};

// export so generated paths resolve inside this crate's tests
extern crate self as ornament;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Re-exports
//

pub use crate::core::{
    error::{Error, ErrorClass},
    persist::{Adapter, MemoryAdapter, QueryOptions},
    value::Value,
};

///
/// Prelude
/// The derive macros share their names with the type and trait they
/// implement; they live in the macro namespace, so both import cleanly.
///

pub mod prelude {
    pub use crate::{
        Model, ModelEnum,
        core::{
            error::Error,
            instance::{FieldSet, Model},
            persist::{Adapter, MemoryAdapter, QueryOptions},
            traits::{
                Decorator, DecoratorType, FieldType as _, ModelEnum as _, ModelKind as _,
                ObjectKind,
            },
            types::DateTime,
            value::Value,
        },
    };
}
