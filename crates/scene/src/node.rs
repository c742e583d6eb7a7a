use serde::{Deserialize, Serialize};
use uwds_common::{Entity, MeshId, NodeId, Property, Transform};

/// What a node stands for in the scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// An abstract frame or object without geometry of its own.
    #[default]
    Entity,
    /// A node rendered with the meshes it references.
    Mesh,
    /// A viewpoint.
    Camera,
}

/// A node of the relation graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub parent: Option<NodeId>,
    /// Pose relative to the parent.
    #[serde(default)]
    pub pose: Transform,
    /// Geometry held in the shared asset store.
    #[serde(default)]
    pub meshes: Vec<MeshId>,
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Time of the last perception of this node, in seconds.
    #[serde(default)]
    pub last_observation: Option<f64>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::default(),
            parent: None,
            pose: Transform::default(),
            meshes: Vec::new(),
            properties: Vec::new(),
            last_observation: None,
        }
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_parent(mut self, parent: impl Into<NodeId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_pose(mut self, pose: Transform) -> Self {
        self.pose = pose;
        self
    }

    pub fn with_mesh(mut self, mesh: impl Into<MeshId>) -> Self {
        self.meshes.push(mesh.into());
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Value of the first property with this name.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_str())
    }
}

impl Entity for Node {
    type Id = NodeId;

    fn id(&self) -> &NodeId {
        &self.id
    }
}
