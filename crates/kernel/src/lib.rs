//! World Kernel: named worlds, their transactional update, and the registry
//! that creates them on first use.
//!
//! # Invariants
//! - Every mutation of a world's domain stores flows through
//!   [`World::apply_changes`] or [`World::reset`], under the world's write lock.
//! - A batch is applied nodes, then situations, then meshes; within a domain,
//!   deletions before updates.
//! - All worlds of a registry share one asset store.

pub mod changes;
pub mod registry;
pub mod world;

pub use changes::{Changes, ChangesError, Invalidations};
pub use registry::WorldRegistry;
pub use world::{World, WorldState};
