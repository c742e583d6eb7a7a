use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;
use uwds_assets::{AssetStore, MeshScope};
use uwds_common::{DomainStore, Entity, Header, WorldName};
use uwds_scene::RelationGraph;
use uwds_timeline::Timeline;

use crate::changes::{Changes, Invalidations};

type IdOf<S> = <<S as DomainStore>::Entity as Entity>::Id;

/// The three domain stores of a world, guarded together by the world lock.
#[derive(Debug)]
pub struct WorldState {
    scene: RelationGraph,
    timeline: Timeline,
    meshes: MeshScope,
    attached: bool,
}

impl WorldState {
    pub fn scene(&self) -> &RelationGraph {
        &self.scene
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn meshes(&self) -> &MeshScope {
        &self.meshes
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

/// A named world: one relation graph, one timeline, and a view of the asset
/// store shared with the other worlds of its registry.
///
/// Share it as `Arc<World>`. Writers serialize on the world lock; readers
/// holding [`World::read`] never see a batch half applied.
#[derive(Debug)]
pub struct World {
    name: WorldName,
    state: RwLock<WorldState>,
}

impl World {
    /// Create an empty world publishing its meshes into `assets`.
    ///
    /// The world holds meshes under a holder token of its own, so it never
    /// shares holds with an earlier world of the same name.
    pub fn new(name: impl Into<WorldName>, assets: Arc<AssetStore>) -> Self {
        let name = name.into();
        let meshes = assets.scope(name.clone());
        Self {
            name,
            state: RwLock::new(WorldState {
                scene: RelationGraph::new(),
                timeline: Timeline::new(),
                meshes,
                attached: true,
            }),
        }
    }

    pub fn name(&self) -> &WorldName {
        &self.name
    }

    /// Shared read access to all three domain stores at once.
    pub fn read(&self) -> RwLockReadGuard<'_, WorldState> {
        self.state.read()
    }

    /// False once the registry that created this world has been closed.
    pub fn is_attached(&self) -> bool {
        self.state.read().is_attached()
    }

    /// Apply a batch and report what it touched.
    ///
    /// Nodes, then situations, then meshes; in each domain the deletions go
    /// first, so a batch deleting and updating the same id leaves it present.
    /// Deleting an absent id is not an error and is still reported. Concurrent
    /// batches touching the same entity resolve last-write-wins.
    pub fn apply_changes(&self, header: &Header, changes: Changes) -> Invalidations {
        let _span = tracing::debug_span!(
            "apply_changes",
            world = %self.name,
            seq = header.seq,
            source = %header.source,
        )
        .entered();

        let Changes {
            nodes_to_delete,
            nodes_to_update,
            situations_to_delete,
            situations_to_update,
            meshes_to_delete,
            meshes_to_update,
        } = changes;

        let mut state = self.state.write();
        if !state.attached {
            tracing::warn!(world = %self.name, "applying changes to a world detached from its registry");
        }

        let (node_ids_deleted, node_ids_updated) =
            apply_domain(&mut state.scene, nodes_to_delete, nodes_to_update);
        let (situation_ids_deleted, situation_ids_updated) =
            apply_domain(&mut state.timeline, situations_to_delete, situations_to_update);
        let (mesh_ids_deleted, mesh_ids_updated) =
            apply_domain(&mut state.meshes, meshes_to_delete, meshes_to_update);
        drop(state);

        let invalidations = Invalidations {
            node_ids_deleted,
            node_ids_updated,
            situation_ids_deleted,
            situation_ids_updated,
            mesh_ids_deleted,
            mesh_ids_updated,
        };
        tracing::debug!(
            nodes_deleted = invalidations.node_ids_deleted.len(),
            nodes_updated = invalidations.node_ids_updated.len(),
            situations_deleted = invalidations.situation_ids_deleted.len(),
            situations_updated = invalidations.situation_ids_updated.len(),
            meshes_deleted = invalidations.mesh_ids_deleted.len(),
            meshes_updated = invalidations.mesh_ids_updated.len(),
            "changes applied"
        );
        invalidations
    }

    /// Empty the graph and the timeline and release this world's meshes.
    ///
    /// Meshes another world still holds stay in the shared store. Nothing is
    /// reported.
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.scene.reset();
        state.timeline.reset();
        state.meshes.reset();
        tracing::debug!(world = %self.name, "world reset");
    }

    /// Wait for in-flight writers, then mark the world as dropped by its
    /// registry.
    pub(crate) fn detach(&self) {
        self.state.write().attached = false;
    }
}

fn apply_domain<S: DomainStore>(
    store: &mut S,
    to_delete: Vec<IdOf<S>>,
    to_update: Vec<S::Entity>,
) -> (Vec<IdOf<S>>, Vec<IdOf<S>>) {
    store.remove(&to_delete);
    let mut updated = Vec::with_capacity(to_update.len());
    for entity in to_update {
        updated.push(entity.id().clone());
        store.update(entity);
    }
    (to_delete, updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use uwds_assets::Mesh;
    use uwds_common::{MeshId, NodeId, SituationId, Transform};
    use uwds_scene::{Node, NodeKind};
    use uwds_timeline::{Situation, SituationKind};

    fn world() -> World {
        World::new("test", Arc::new(AssetStore::new()))
    }

    fn node_ids(ids: &[&str]) -> Vec<NodeId> {
        ids.iter().map(|&id| NodeId::from(id)).collect()
    }

    #[test]
    fn world_starts_empty() {
        let w = world();
        assert_eq!(w.name().as_str(), "test");
        let state = w.read();
        assert!(state.scene().is_empty());
        assert!(state.timeline().is_empty());
        assert!(state.meshes().is_empty());
    }

    #[test]
    fn delete_and_update_reported_for_empty_world() {
        let w = world();
        let changes = Changes::new()
            .delete_node("n1")
            .update_node(Node::new("n2", "cup"));
        let inv = w.apply_changes(&Header::default(), changes);

        assert_eq!(
            inv,
            Invalidations {
                node_ids_deleted: node_ids(&["n1"]),
                node_ids_updated: node_ids(&["n2"]),
                ..Default::default()
            }
        );
        let ids: Vec<NodeId> = w.read().scene().ids().cloned().collect();
        assert_eq!(ids, node_ids(&["n2"]));
    }

    #[test]
    fn deleted_lists_are_verbatim() {
        let w = world();
        let changes = Changes::new()
            .delete_node("x")
            .delete_node("x")
            .delete_node("absent")
            .delete_situation("s9")
            .delete_mesh("m9");
        let inv = w.apply_changes(&Header::default(), changes);
        assert_eq!(inv.node_ids_deleted, node_ids(&["x", "x", "absent"]));
        assert_eq!(inv.situation_ids_deleted, vec![SituationId::from("s9")]);
        assert_eq!(inv.mesh_ids_deleted, vec![MeshId::from("m9")]);
        assert!(inv.node_ids_updated.is_empty());
    }

    #[test]
    fn updated_lists_keep_order_and_duplicates() {
        let w = world();
        let changes = Changes::new()
            .update_node(Node::new("b", "b"))
            .update_node(Node::new("a", "a"))
            .update_node(Node::new("b", "b2"))
            .update_situation(Situation::new("s1", SituationKind::Fact, 0.0))
            .update_mesh(Mesh::unit_cube("m1"));
        let inv = w.apply_changes(&Header::default(), changes);

        assert_eq!(inv.node_ids_updated, node_ids(&["b", "a", "b"]));
        assert_eq!(inv.situation_ids_updated, vec![SituationId::from("s1")]);
        assert_eq!(inv.mesh_ids_updated, vec![MeshId::from("m1")]);

        let state = w.read();
        assert_eq!(state.scene().len(), 2);
        assert_eq!(state.scene().get("b").unwrap().name, "b2");
        assert!(state.meshes().get("m1").is_some());
    }

    #[test]
    fn delete_then_update_same_id_leaves_it_present() {
        let w = world();
        w.apply_changes(
            &Header::default(),
            Changes::new().update_node(Node::new("x", "old").with_kind(NodeKind::Camera)),
        );
        let changes = Changes::new()
            .delete_node("x")
            .update_node(Node::new("x", "new"))
            .delete_situation("s")
            .update_situation(Situation::new("s", SituationKind::Action, 1.0))
            .delete_mesh("m")
            .update_mesh(Mesh::unit_cube("m"));
        w.apply_changes(&Header::default(), changes);

        let state = w.read();
        let x = state.scene().get("x").unwrap();
        assert_eq!(x.name, "new");
        assert_eq!(x.kind, NodeKind::Entity);
        assert!(state.timeline().contains("s"));
        assert!(state.meshes().get("m").is_some());
    }

    #[test]
    fn double_delete_is_harmless() {
        let w = world();
        w.apply_changes(&Header::default(), Changes::new().update_node(Node::new("n", "n")));
        for _ in 0..2 {
            let inv = w.apply_changes(&Header::default(), Changes::new().delete_node("n"));
            assert_eq!(inv.node_ids_deleted, node_ids(&["n"]));
            assert!(w.read().scene().is_empty());
        }
    }

    #[test]
    fn update_replaces_stale_attributes() {
        let w = world();
        let pose = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        w.apply_changes(
            &Header::default(),
            Changes::new().update_node(Node::new("n", "cup").with_parent("table").with_pose(pose)),
        );
        w.apply_changes(&Header::default(), Changes::new().update_node(Node::new("n", "cup")));

        let state = w.read();
        let n = state.scene().get("n").unwrap();
        assert!(n.parent.is_none());
        assert_eq!(n.pose, Transform::default());
    }

    #[test]
    fn reset_then_apply_behaves_like_fresh_world() {
        let w = world();
        w.apply_changes(
            &Header::default(),
            Changes::new()
                .update_node(Node::new("n", "n"))
                .update_situation(Situation::new("s", SituationKind::Fact, 0.0))
                .update_mesh(Mesh::unit_cube("m")),
        );
        w.reset();
        {
            let state = w.read();
            assert!(state.scene().is_empty());
            assert!(state.timeline().is_empty());
            assert!(state.timeline().active_at(0.0).is_empty());
            assert!(state.meshes().is_empty());
            assert!(state.meshes().get("m").is_none());
        }

        let changes = Changes::new().delete_node("n1").update_node(Node::new("n2", "n2"));
        let inv = w.apply_changes(&Header::default(), changes);
        assert_eq!(inv.node_ids_deleted, node_ids(&["n1"]));
        assert_eq!(inv.node_ids_updated, node_ids(&["n2"]));
        assert_eq!(w.read().scene().len(), 1);
    }

    #[test]
    fn reset_keeps_meshes_held_by_other_worlds() {
        let assets = Arc::new(AssetStore::new());
        let a = World::new("a", Arc::clone(&assets));
        let b = World::new("b", Arc::clone(&assets));
        a.apply_changes(&Header::default(), Changes::new().update_mesh(Mesh::unit_cube("shared")));
        b.apply_changes(&Header::default(), Changes::new().update_mesh(Mesh::unit_cube("shared")));
        a.apply_changes(&Header::default(), Changes::new().update_mesh(Mesh::unit_cube("mine")));

        a.reset();
        assert!(assets.contains("shared"));
        assert!(!assets.contains("mine"));
        assert_eq!(b.read().meshes().len(), 1);
    }

    #[test]
    fn same_name_worlds_hold_meshes_separately() {
        let assets = Arc::new(AssetStore::new());
        let old = World::new("robot", Arc::clone(&assets));
        old.apply_changes(&Header::default(), Changes::new().update_mesh(Mesh::unit_cube("old")));

        let new = World::new("robot", Arc::clone(&assets));
        assert!(new.read().meshes().is_empty());
        new.apply_changes(&Header::default(), Changes::new().update_mesh(Mesh::unit_cube("new")));

        old.reset();
        assert!(!assets.contains("old"));
        assert!(assets.contains("new"));
        assert_eq!(new.read().meshes().len(), 1);
    }

    #[test]
    fn readers_never_see_half_applied_batches() {
        let w = Arc::new(world());
        std::thread::scope(|s| {
            for t in 0..4 {
                let w = Arc::clone(&w);
                s.spawn(move || {
                    for i in 0..100 {
                        let changes = Changes::new()
                            .update_node(Node::new(format!("n{t}-{i}"), "n"))
                            .update_situation(Situation::new(
                                format!("s{t}-{i}"),
                                SituationKind::Generic,
                                i as f64,
                            ));
                        w.apply_changes(&Header::default(), changes);
                    }
                });
            }
            for _ in 0..2 {
                let w = Arc::clone(&w);
                s.spawn(move || {
                    for _ in 0..200 {
                        let state = w.read();
                        assert_eq!(state.scene().len(), state.timeline().len());
                    }
                });
            }
        });
        assert_eq!(w.read().scene().len(), 400);
    }
}
