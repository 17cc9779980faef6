mod build;


use crate::{
    config::MappingConfig,
    error::Error,
    model::{DescriptorId, field::FieldDescriptor, object::ObjectDescriptor},
    query::ExpansionCache,
};
use arc_swap::ArcSwap;
use build::Construction;
use forcedb_schema::node::{Mapped, TypeToken};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, LazyLock, Mutex},
};
use tracing::trace;

///
/// SHARED
/// one registry per distinct mapping configuration
///

static SHARED: LazyLock<Mutex<HashMap<MappingConfig, Arc<Registry>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

///
/// Registry
///
/// Builds, caches and publishes descriptors.
///
/// Lookups read an immutable snapshot and take no lock. Construction is
/// serialized behind `building`; each outermost build publishes its whole
/// transitive closure in one swap, so readers never observe a partially
/// built descriptor.
///

pub struct Registry {
    config: MappingConfig,
    published: ArcSwap<Published>,
    building: Mutex<()>,
    pub(crate) expansions: ExpansionCache,
}

impl Registry {
    #[must_use]
    pub fn new(config: MappingConfig) -> Self {
        Self {
            config,
            published: ArcSwap::from_pointee(Published::default()),
            building: Mutex::new(()),
            expansions: ExpansionCache::default(),
        }
    }

    /// Process-wide registry for `config`, created on first use.
    #[must_use]
    pub fn shared(config: &MappingConfig) -> Arc<Self> {
        let mut shared = SHARED.lock().expect("shared registry map poisoned");

        Arc::clone(
            shared
                .entry(config.clone())
                .or_insert_with(|| Arc::new(Self::new(config.clone()))),
        )
    }

    #[must_use]
    pub const fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Resolve a type token. Ineligible types yield `None` and are
    /// remembered so later lookups skip schema inspection.
    pub fn descriptor(&self, token: TypeToken) -> Result<Option<Arc<ObjectDescriptor>>, Error> {
        if let Some(slot) = self.published.load().slot(token.type_id()) {
            return Ok(self.from_slot(slot));
        }

        let _guard = self.building.lock().expect("registry build lock poisoned");

        // another caller may have published while we waited
        let base = self.published.load_full();
        if let Some(slot) = base.slot(token.type_id()) {
            return Ok(self.from_slot(slot));
        }

        let mut construction = Construction::new(&self.config, &base);
        let root = construction.resolve(token)?;
        let next = construction.finish();
        self.published.store(Arc::new(next));

        Ok(root.and_then(|id| self.get(id)))
    }

    /// Resolve a mapped type, failing when its schema is not eligible.
    pub fn descriptor_of<T: Mapped>(&self) -> Result<Arc<ObjectDescriptor>, Error> {
        let token = TypeToken::of::<T>();

        self.descriptor(token)?
            .ok_or_else(|| Error::unmappable(token.type_name(), "schema is not marked as mapped"))
    }

    /// Published descriptor by arena id.
    #[must_use]
    pub fn get(&self, id: DescriptorId) -> Option<Arc<ObjectDescriptor>> {
        self.published.load().arena.get(id.index()).cloned()
    }

    /// Published descriptor by wire type name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<Arc<ObjectDescriptor>> {
        let published = self.published.load();
        let id = published.by_name.get(name)?;

        published.arena.get(id.index()).cloned()
    }

    /// Target descriptor of a relationship field.
    #[must_use]
    pub fn related(&self, field: &FieldDescriptor) -> Option<Arc<ObjectDescriptor>> {
        field.related().and_then(|id| self.get(id))
    }

    /// Number of published descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.published.load().arena.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn from_slot(&self, slot: Slot) -> Option<Arc<ObjectDescriptor>> {
        match slot {
            Slot::Mapped(id) => self.get(id),
            Slot::Ineligible => {
                trace!("negative descriptor cache hit");
                None
            }
        }
    }
}

///
/// Published
/// Immutable snapshot swapped in after each completed build.
///

#[derive(Clone, Default)]
pub(crate) struct Published {
    arena: Vec<Arc<ObjectDescriptor>>,
    by_type: HashMap<TypeId, Slot>,
    by_name: HashMap<&'static str, DescriptorId>,
}

impl Published {
    fn slot(&self, type_id: TypeId) -> Option<Slot> {
        self.by_type.get(&type_id).copied()
    }
}

///
/// Slot
///

#[derive(Clone, Copy, Debug)]
enum Slot {
    Mapped(DescriptorId),
    Ineligible,
}
