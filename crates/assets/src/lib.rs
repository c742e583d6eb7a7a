//! Shared geometry store.
//!
//! One [`AssetStore`] is shared by every world of a registry. Meshes are
//! published by id and never mutated afterwards; a later update swaps in a
//! new [`Mesh`] behind a fresh `Arc`.
//!
//! # Invariants
//! - The store is internally synchronized; every operation is atomic with
//!   respect to other store operations.
//! - Each mesh records the worlds holding it. Releasing a world drops only the
//!   meshes no other world still holds.
//! - Callers holding a world lock may take the store lock, never the reverse.

mod mesh;
mod scope;
mod store;

pub use mesh::{Aabb, Mesh, MeshDigest};
pub use scope::MeshScope;
pub use store::AssetStore;

pub fn crate_info() -> &'static str {
    "uwds-assets v0.1.0"
}
