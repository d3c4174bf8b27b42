use crate::{
    error::ConstructError,
    traits::{DecoratorType, ObjectKind},
    types::DateTime,
    value::ObjectValue,
};
use std::{
    collections::HashMap,
    sync::{LazyLock, RwLock},
};

use super::ConstructArgs;

type Constructor = fn(ConstructArgs) -> Result<ObjectValue, ConstructError>;

///
/// ObjectEntry
/// How to build one registered object type.
///

#[derive(Clone, Copy, Debug)]
pub(crate) struct ObjectEntry {
    pub kind: ObjectKind,
    pub construct: Constructor,
}

impl ObjectEntry {
    fn of<T: DecoratorType>() -> Self {
        Self {
            kind: T::KIND,
            construct: construct_erased::<T>,
        }
    }
}

fn construct_erased<T: DecoratorType>(args: ConstructArgs) -> Result<ObjectValue, ConstructError> {
    T::construct(args).map(ObjectValue::new)
}

///
/// OBJECTS
/// Process-wide registry of object types, keyed by type path.
///

static OBJECTS: LazyLock<RwLock<HashMap<&'static str, ObjectEntry>>> = LazyLock::new(|| {
    let mut objects = HashMap::new();
    objects.insert(DateTime::PATH, ObjectEntry::of::<DateTime>());

    RwLock::new(objects)
});

/// Register `T` under its path. Returns false when the path was already
/// registered; the existing entry is kept.
pub fn register_object<T: DecoratorType>() -> bool {
    if is_registered(T::PATH) {
        return false;
    }

    let mut objects = OBJECTS
        .write()
        .expect("object registry RwLock poisoned while acquiring write lock");

    if objects.contains_key(T::PATH) {
        return false;
    }
    objects.insert(T::PATH, ObjectEntry::of::<T>());

    true
}

/// Whether an object type is registered under `path`.
#[must_use]
pub fn is_registered(path: &str) -> bool {
    resolve(path).is_some()
}

pub(crate) fn resolve(path: &str) -> Option<ObjectEntry> {
    OBJECTS
        .read()
        .expect("object registry RwLock poisoned while acquiring read lock")
        .get(path)
        .copied()
}
