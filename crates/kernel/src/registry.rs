use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use uwds_assets::AssetStore;
use uwds_common::WorldName;

use crate::world::World;

/// Named worlds, created on first access, all sharing one asset store.
///
/// Lock order: registry map, then a world, then the asset store.
#[derive(Debug, Default)]
pub struct WorldRegistry {
    assets: Arc<AssetStore>,
    worlds: RwLock<BTreeMap<WorldName, Arc<World>>>,
}

impl WorldRegistry {
    /// A registry with its own, fresh asset store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry whose worlds publish into `assets`.
    pub fn with_assets(assets: Arc<AssetStore>) -> Self {
        Self {
            assets,
            worlds: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn assets(&self) -> &Arc<AssetStore> {
        &self.assets
    }

    /// The world called `name`, created empty if it does not exist yet.
    ///
    /// Repeated calls return the same instance until [`close`](Self::close).
    /// When several callers race to create the same name, exactly one world is
    /// created.
    pub fn get_or_create(&self, name: &str) -> Arc<World> {
        if let Some(world) = self.get(name) {
            return world;
        }

        let mut worlds = self.worlds.write();
        let world = worlds.entry(WorldName::from(name)).or_insert_with(|| {
            tracing::info!(world = %name, "creating world");
            Arc::new(World::new(name, Arc::clone(&self.assets)))
        });
        Arc::clone(world)
    }

    /// The world called `name`, if it was created and not closed since.
    pub fn get(&self, name: &str) -> Option<Arc<World>> {
        self.worlds.read().get(name).cloned()
    }

    /// Drop every world. The asset store is left untouched.
    ///
    /// Blocks until writers in flight on those worlds finish; handles kept by
    /// callers afterwards point at detached worlds. Later lookups start over
    /// with empty worlds.
    pub fn close(&self) {
        let mut worlds = self.worlds.write();
        let closed = std::mem::take(&mut *worlds);
        for world in closed.values() {
            world.detach();
        }
        tracing::info!(worlds = closed.len(), "registry closed");
    }

    /// Names of the open worlds, sorted.
    pub fn names(&self) -> Vec<WorldName> {
        self.worlds.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.worlds.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.read().is_empty()
    }
}
