//! Shared types for the underworlds engine: identifiers, poses, provenance
//! headers and the contract every domain store implements.
//!
//! # Invariants
//! - Identifiers are caller-assigned and stable across updates.
//! - Identifier types are distinct per domain; a node id never names a mesh.

mod ids;
mod store;
mod types;

pub use ids::{HolderId, MeshId, NodeId, SituationId, WorldName};
pub use store::{DomainStore, Entity};
pub use types::{Header, Property, Transform};

pub fn crate_info() -> &'static str {
    "uwds-common v0.1.0"
}
