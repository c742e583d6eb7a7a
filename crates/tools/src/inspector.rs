use uwds_common::{NodeId, WorldName};
use uwds_kernel::{World, WorldRegistry};

/// World inspector for developer tooling.
///
/// Read-only queries against a world for debugging and the CLI.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        let state = world.read();
        WorldSummary {
            name: world.name().clone(),
            node_count: state.scene().len(),
            situation_count: state.timeline().len(),
            ongoing_situations: state.timeline().ongoing().count(),
            mesh_count: state.meshes().len(),
            attached: state.is_attached(),
        }
    }

    /// Summaries of every open world of a registry, in name order.
    pub fn registry(registry: &WorldRegistry) -> Vec<WorldSummary> {
        registry
            .names()
            .iter()
            .filter_map(|name| registry.get(name.as_str()))
            .map(|world| Self::summary(&world))
            .collect()
    }

    /// Pose of a node, both relative to its parent and composed up its chain.
    pub fn inspect_node(world: &World, id: &str) -> Option<NodeInfo> {
        let state = world.read();
        let node = state.scene().get(id)?;
        let absolute = state.scene().world_transform(id)?;
        let p = node.pose.position;
        let a = absolute.position;
        Some(NodeInfo {
            id: node.id.clone(),
            name: node.name.clone(),
            parent: node.parent.clone(),
            depth: state.scene().ancestors(id).len(),
            position: [p.x, p.y, p.z],
            absolute_position: [a.x, a.y, a.z],
            mesh_count: node.meshes.len(),
        })
    }

    /// List all node IDs in the world.
    pub fn list_nodes(world: &World) -> Vec<NodeId> {
        world.read().scene().ids().cloned().collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldSummary {
    pub name: WorldName,
    pub node_count: usize,
    pub situation_count: usize,
    pub ongoing_situations: usize,
    pub mesh_count: usize,
    pub attached: bool,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World '{}': nodes={} situations={} (ongoing={}) meshes={}",
            self.name, self.node_count, self.situation_count, self.ongoing_situations, self.mesh_count
        )?;
        if !self.attached {
            write!(f, " [detached]")?;
        }
        Ok(())
    }
}

/// Detailed info about a single node.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    /// Number of reachable ancestors.
    pub depth: usize,
    pub position: [f32; 3],
    pub absolute_position: [f32; 3],
    pub mesh_count: usize,
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Node [{}] '{}' depth={} pos=({:.2}, {:.2}, {:.2}) abs=({:.2}, {:.2}, {:.2}) meshes={}",
            self.id,
            self.name,
            self.depth,
            self.position[0],
            self.position[1],
            self.position[2],
            self.absolute_position[0],
            self.absolute_position[1],
            self.absolute_position[2],
            self.mesh_count,
        )
    }
}
