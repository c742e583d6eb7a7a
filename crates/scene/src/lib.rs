//! Spatial domain: a directed graph of named nodes.
//!
//! Each node optionally names a parent and carries a pose relative to it.
//!
//! # Invariants
//! - At most one node per id; updating an id replaces the whole node.
//! - Parent references are not checked. A dangling parent is allowed and
//!   queries treat the node as a root. Parent cycles are tolerated and cut.

mod graph;
mod node;

pub use graph::RelationGraph;
pub use node::{Node, NodeKind};
