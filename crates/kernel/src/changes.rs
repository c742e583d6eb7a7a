use serde::{Deserialize, Serialize};
use uwds_assets::Mesh;
use uwds_common::{MeshId, NodeId, SituationId};
use uwds_scene::Node;
use uwds_timeline::Situation;

/// A batch of deletions and upserts for one world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Changes {
    pub nodes_to_delete: Vec<NodeId>,
    pub nodes_to_update: Vec<Node>,
    pub situations_to_delete: Vec<SituationId>,
    pub situations_to_update: Vec<Situation>,
    pub meshes_to_delete: Vec<MeshId>,
    pub meshes_to_update: Vec<Mesh>,
}

/// Which entities a batch touched, per domain.
///
/// Deleted lists repeat the batch's delete lists verbatim; updated lists hold
/// the ids of the updated entities in batch order, duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invalidations {
    pub node_ids_deleted: Vec<NodeId>,
    pub node_ids_updated: Vec<NodeId>,
    pub situation_ids_deleted: Vec<SituationId>,
    pub situation_ids_updated: Vec<SituationId>,
    pub mesh_ids_deleted: Vec<MeshId>,
    pub mesh_ids_updated: Vec<MeshId>,
}

/// Structural problems in a batch, found before it reaches a world.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChangesError {
    #[error("empty id at index {index} of {list}")]
    EmptyId { list: &'static str, index: usize },
    #[error("situation {id} has a non-finite time (start {start}, end {end:?})")]
    NonFiniteTime {
        id: SituationId,
        start: f64,
        end: Option<f64>,
    },
    #[error("situation {id} ends at {end} before it starts at {start}")]
    InvertedInterval { id: SituationId, start: f64, end: f64 },
    #[error("situation {id} has confidence {confidence} outside [0, 1]")]
    ConfidenceOutOfRange { id: SituationId, confidence: f32 },
    #[error("mesh {id} references vertex {index} but has {vertex_count} vertices")]
    VertexOutOfRange {
        id: MeshId,
        index: u32,
        vertex_count: usize,
    },
}

impl Changes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delete_node(mut self, id: impl Into<NodeId>) -> Self {
        self.nodes_to_delete.push(id.into());
        self
    }

    pub fn update_node(mut self, node: Node) -> Self {
        self.nodes_to_update.push(node);
        self
    }

    pub fn delete_situation(mut self, id: impl Into<SituationId>) -> Self {
        self.situations_to_delete.push(id.into());
        self
    }

    pub fn update_situation(mut self, situation: Situation) -> Self {
        self.situations_to_update.push(situation);
        self
    }

    pub fn delete_mesh(mut self, id: impl Into<MeshId>) -> Self {
        self.meshes_to_delete.push(id.into());
        self
    }

    pub fn update_mesh(mut self, mesh: Mesh) -> Self {
        self.meshes_to_update.push(mesh);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.nodes_to_delete.is_empty()
            && self.nodes_to_update.is_empty()
            && self.situations_to_delete.is_empty()
            && self.situations_to_update.is_empty()
            && self.meshes_to_delete.is_empty()
            && self.meshes_to_update.is_empty()
    }

    /// Reject batches the engine should never see.
    ///
    /// Worlds apply any batch they are given; transports call this first.
    pub fn validate(&self) -> Result<(), ChangesError> {
        check_ids("nodes_to_delete", self.nodes_to_delete.iter().map(NodeId::as_str))?;
        check_ids(
            "nodes_to_update",
            self.nodes_to_update.iter().map(|n| n.id.as_str()),
        )?;
        check_ids(
            "situations_to_delete",
            self.situations_to_delete.iter().map(SituationId::as_str),
        )?;
        check_ids(
            "situations_to_update",
            self.situations_to_update.iter().map(|s| s.id.as_str()),
        )?;
        check_ids("meshes_to_delete", self.meshes_to_delete.iter().map(MeshId::as_str))?;
        check_ids(
            "meshes_to_update",
            self.meshes_to_update.iter().map(|m| m.id.as_str()),
        )?;

        for situation in &self.situations_to_update {
            if !(0.0..=1.0).contains(&situation.confidence) {
                return Err(ChangesError::ConfidenceOutOfRange {
                    id: situation.id.clone(),
                    confidence: situation.confidence,
                });
            }
            if !situation.start.is_finite() || situation.end.is_some_and(|end| !end.is_finite()) {
                return Err(ChangesError::NonFiniteTime {
                    id: situation.id.clone(),
                    start: situation.start,
                    end: situation.end,
                });
            }
            if let Some(end) = situation.end {
                if end < situation.start {
                    return Err(ChangesError::InvertedInterval {
                        id: situation.id.clone(),
                        start: situation.start,
                        end,
                    });
                }
            }
        }

        for mesh in &self.meshes_to_update {
            let vertex_count = mesh.vertices.len();
            if let Some(&index) = mesh
                .triangles
                .iter()
                .flatten()
                .find(|&&i| i as usize >= vertex_count)
            {
                return Err(ChangesError::VertexOutOfRange {
                    id: mesh.id.clone(),
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }
}

fn check_ids<'a>(
    list: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ChangesError> {
    for (index, id) in ids.enumerate() {
        if id.is_empty() {
            return Err(ChangesError::EmptyId { list, index });
        }
    }
    Ok(())
}

impl Invalidations {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of ids across all six lists.
    pub fn len(&self) -> usize {
        self.node_ids_deleted.len()
            + self.node_ids_updated.len()
            + self.situation_ids_deleted.len()
            + self.situation_ids_updated.len()
            + self.mesh_ids_deleted.len()
            + self.mesh_ids_updated.len()
    }
}
