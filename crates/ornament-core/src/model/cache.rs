use crate::{
    model::{builder::ModelBuilder, metadata::ModelMetadata},
    obs::sink::{MetricsEvent, record},
    traits::ModelKind,
};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, LazyLock, OnceLock, RwLock},
};

type Slot = Arc<OnceLock<Arc<ModelMetadata>>>;

///
/// METADATA
///
/// One slot per concrete model type. The map lock is only held to find or
/// create a slot; the build itself runs inside the slot's `OnceLock`, so
/// concurrent first access builds each table at most once and a
/// `declare` may resolve other models' metadata.
///

static METADATA: LazyLock<RwLock<HashMap<TypeId, Slot>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Metadata for `M`, built on first access and cached for the process.
#[must_use]
pub fn metadata<M: ModelKind>() -> Arc<ModelMetadata> {
    let slot = slot_for(TypeId::of::<M>());

    Arc::clone(slot.get_or_init(|| Arc::new(build::<M>())))
}

fn slot_for(key: TypeId) -> Slot {
    if let Some(slot) = METADATA
        .read()
        .expect("metadata RwLock poisoned while acquiring read lock")
        .get(&key)
    {
        return Arc::clone(slot);
    }

    let mut cache = METADATA
        .write()
        .expect("metadata RwLock poisoned while acquiring write lock");

    Arc::clone(cache.entry(key).or_default())
}

fn build<M: ModelKind>() -> ModelMetadata {
    let mut builder = ModelBuilder::new(M::PATH);
    M::declare(&mut builder);
    let metadata = builder.build();

    record(MetricsEvent::MetadataBuild {
        model_path: M::PATH,
        fields: metadata.field_count(),
        virtuals: metadata.virtual_names().count(),
    });

    metadata
}
