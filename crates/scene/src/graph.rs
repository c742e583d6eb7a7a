use std::collections::{BTreeMap, BTreeSet};

use uwds_common::{DomainStore, NodeId, Transform};

use crate::node::Node;

/// The spatial store of a world.
///
/// Uses BTreeMap so iteration order is the id order on every platform.
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    nodes: BTreeMap<NodeId, Node>,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Nodes whose parent is `id`.
    pub fn children<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .values()
            .filter(move |n| n.parent.as_ref().is_some_and(|p| p.as_str() == id))
    }

    /// Nodes without a parent, or whose parent is not in the graph.
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| match &n.parent {
            None => true,
            Some(p) => !self.nodes.contains_key(p),
        })
    }

    /// First node (in id order) carrying this name.
    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.values().find(|n| n.name == name)
    }

    /// Parent chain of `id`, nearest first.
    ///
    /// Stops at the first parent that is absent from the graph, and at the
    /// first node already visited when the parent links form a cycle.
    pub fn ancestors(&self, id: &str) -> Vec<&Node> {
        let mut chain = Vec::new();
        let Some(start) = self.nodes.get(id) else {
            return chain;
        };
        let mut visited: BTreeSet<&str> = BTreeSet::new();
        visited.insert(start.id.as_str());

        let mut next = start.parent.as_ref();
        while let Some(parent_id) = next {
            let Some(parent) = self.nodes.get(parent_id) else {
                break;
            };
            if !visited.insert(parent.id.as_str()) {
                tracing::warn!(node = %id, at = %parent.id, "parent cycle in relation graph");
                break;
            }
            chain.push(parent);
            next = parent.parent.as_ref();
        }
        chain
    }

    /// Pose of `id` expressed in the frame of its outermost reachable ancestor.
    pub fn world_transform(&self, id: &str) -> Option<Transform> {
        let node = self.nodes.get(id)?;
        let pose = self
            .ancestors(id)
            .into_iter()
            .fold(node.pose, |acc, parent| parent.pose.compose(&acc));
        Some(pose)
    }
}

impl DomainStore for RelationGraph {
    type Entity = Node;

    fn update(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    fn remove(&mut self, ids: &[NodeId]) {
        for id in ids {
            self.nodes.remove(id);
        }
    }

    fn reset(&mut self) {
        self.nodes.clear();
    }
}
