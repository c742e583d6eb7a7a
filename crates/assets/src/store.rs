use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use uwds_common::{HolderId, MeshId, WorldName};

use crate::mesh::{Mesh, MeshDigest};
use crate::scope::MeshScope;

#[derive(Debug)]
struct MeshEntry {
    mesh: Arc<Mesh>,
    holders: BTreeSet<HolderId>,
}

/// Mesh store shared by all worlds of a registry.
///
/// Share it as `Arc<AssetStore>`; all methods take `&self`. Concurrent
/// updates to the same id resolve last-write-wins.
#[derive(Debug, Default)]
pub struct AssetStore {
    meshes: RwLock<BTreeMap<MeshId, MeshEntry>>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle through which one world instance publishes and releases
    /// meshes. Every call mints a new holder, even for a name seen before.
    pub fn scope(self: &Arc<Self>, world: WorldName) -> MeshScope {
        MeshScope::new(Arc::clone(self), HolderId::new(), world)
    }

    /// Publish `mesh`, replacing any mesh with the same id, and record
    /// `holder` as holding it.
    pub fn update(&self, holder: HolderId, mesh: Mesh) {
        let id = mesh.id.clone();
        let mesh = Arc::new(mesh);

        let mut meshes = self.meshes.write();
        match meshes.get_mut(&id) {
            Some(entry) => {
                tracing::trace!(mesh = %id, %holder, "mesh replaced");
                entry.mesh = mesh;
                entry.holders.insert(holder);
            }
            None => {
                meshes.insert(
                    id,
                    MeshEntry {
                        mesh,
                        holders: BTreeSet::from([holder]),
                    },
                );
            }
        }
    }

    /// Remove the listed meshes for every holder. Absent ids are ignored.
    pub fn remove(&self, ids: &[MeshId]) {
        let mut meshes = self.meshes.write();
        for id in ids {
            meshes.remove(id);
        }
    }

    /// Drop `holder` from every mesh it holds. Meshes left without any holder
    /// are removed. Returns how many meshes were removed.
    pub fn release(&self, holder: HolderId) -> usize {
        let mut meshes = self.meshes.write();
        let before = meshes.len();
        meshes.retain(|_, entry| !(entry.holders.remove(&holder) && entry.holders.is_empty()));
        let dropped = before - meshes.len();
        if dropped > 0 {
            tracing::debug!(%holder, dropped, "released meshes");
        }
        dropped
    }

    /// Remove every mesh regardless of holders.
    pub fn reset(&self) {
        self.meshes.write().clear();
    }

    pub fn get(&self, id: &str) -> Option<Arc<Mesh>> {
        self.meshes.read().get(id).map(|e| Arc::clone(&e.mesh))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.meshes.read().contains_key(id)
    }

    /// Content digest of the stored mesh, hashed on demand.
    pub fn digest(&self, id: &str) -> Option<MeshDigest> {
        self.get(id).map(|mesh| mesh.digest())
    }

    /// Holders of `id`. Order is stable but carries no meaning.
    pub fn holders(&self, id: &str) -> Vec<HolderId> {
        self.meshes
            .read()
            .get(id)
            .map(|e| e.holders.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Ids of the meshes `holder` holds, in id order.
    pub fn held_by(&self, holder: HolderId) -> Vec<MeshId> {
        self.meshes
            .read()
            .iter()
            .filter(|(_, e)| e.holders.contains(&holder))
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn ids(&self) -> Vec<MeshId> {
        self.meshes.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.meshes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.read().is_empty()
    }
}
