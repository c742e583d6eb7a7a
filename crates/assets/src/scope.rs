use std::sync::Arc;
use uwds_common::{DomainStore, HolderId, MeshId, WorldName};

use crate::mesh::Mesh;
use crate::store::AssetStore;

/// One world instance's handle onto the shared [`AssetStore`].
///
/// Updates publish under the scope's own [`HolderId`]; `reset` releases only
/// what this scope holds. Lookups see every mesh in the store.
#[derive(Debug, Clone)]
pub struct MeshScope {
    store: Arc<AssetStore>,
    holder: HolderId,
    world: WorldName,
}

impl MeshScope {
    pub fn new(store: Arc<AssetStore>, holder: HolderId, world: WorldName) -> Self {
        Self { store, holder, world }
    }

    pub fn holder(&self) -> HolderId {
        self.holder
    }

    /// Name of the world this scope publishes for.
    pub fn world(&self) -> &WorldName {
        &self.world
    }

    pub fn store(&self) -> &Arc<AssetStore> {
        &self.store
    }

    pub fn get(&self, id: &str) -> Option<Arc<Mesh>> {
        self.store.get(id)
    }

    /// Meshes this scope holds.
    pub fn ids(&self) -> Vec<MeshId> {
        self.store.held_by(self.holder)
    }

    pub fn len(&self) -> usize {
        self.ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DomainStore for MeshScope {
    type Entity = Mesh;

    fn update(&mut self, mesh: Mesh) {
        self.store.update(self.holder, mesh);
    }

    fn remove(&mut self, ids: &[MeshId]) {
        self.store.remove(ids);
    }

    fn reset(&mut self) {
        let dropped = self.store.release(self.holder);
        tracing::debug!(world = %self.world, holder = %self.holder, dropped, "mesh scope reset");
    }
}
