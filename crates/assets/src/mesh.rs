use glam::Vec3;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uwds_common::{Entity, MeshId};

/// Triangle mesh geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub id: MeshId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vertices: Vec<Vec3>,
    /// Indices into `vertices`.
    #[serde(default)]
    pub triangles: Vec<[u32; 3]>,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// SHA-256 of a mesh's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshDigest(pub [u8; 32]);

impl fmt::Display for MeshDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl Mesh {
    pub fn new(id: impl Into<MeshId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn with_geometry(mut self, vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        self.vertices = vertices;
        self.triangles = triangles;
        self
    }

    /// Unit cube centred on the origin: 8 vertices, 12 triangles.
    pub fn unit_cube(id: impl Into<MeshId>) -> Self {
        let vertices = (0..8)
            .map(|i| {
                Vec3::new(
                    if i & 1 == 0 { -0.5 } else { 0.5 },
                    if i & 2 == 0 { -0.5 } else { 0.5 },
                    if i & 4 == 0 { -0.5 } else { 0.5 },
                )
            })
            .collect();
        let triangles = vec![
            [0, 2, 1], [1, 2, 3], // -z
            [4, 5, 6], [5, 7, 6], // +z
            [0, 1, 4], [1, 5, 4], // -y
            [2, 6, 3], [3, 6, 7], // +y
            [0, 4, 2], [2, 4, 6], // -x
            [1, 3, 5], [3, 7, 5], // +x
        ];
        Self::new(id, "unit_cube").with_geometry(vertices, triangles)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Bounding box of the vertices, `None` for a mesh without vertices.
    pub fn aabb(&self) -> Option<Aabb> {
        let first = *self.vertices.first()?;
        let (min, max) = self
            .vertices
            .iter()
            .fold((first, first), |(min, max), v| (min.min(*v), max.max(*v)));
        Some(Aabb { min, max })
    }

    /// Content digest over name and geometry. The id is not part of it, so two
    /// ids carrying the same geometry share a digest.
    pub fn digest(&self) -> MeshDigest {
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        hasher.update((self.vertices.len() as u64).to_le_bytes());
        for v in &self.vertices {
            for c in v.to_array() {
                hasher.update(c.to_le_bytes());
            }
        }
        hasher.update((self.triangles.len() as u64).to_le_bytes());
        for tri in &self.triangles {
            for i in tri {
                hasher.update(i.to_le_bytes());
            }
        }
        let result = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&result);
        MeshDigest(bytes)
    }
}

impl Entity for Mesh {
    type Id = MeshId;

    fn id(&self) -> &MeshId {
        &self.id
    }
}
