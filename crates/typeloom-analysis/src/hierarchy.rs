//! Single-rooted type hierarchies and the read-only view the analyses consume

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a node within its owning hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Raw index into the owning hierarchy's node table
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only view of a single-rooted type hierarchy
///
/// The coverage analyzer consumes topology exclusively through this trait
/// and never mutates it. Precondition: the hierarchy is fully built before
/// analysis starts; a node gaining children mid-session invalidates
/// coverage already recorded for its ancestors.
pub trait Hierarchy {
    /// Direct children of `node`, in a stable order
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Ancestor chain of `node`, ordered root first and ending with `node`
    /// itself
    fn ancestry(&self, node: NodeId) -> Vec<NodeId>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HierarchyNode {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory hierarchy registry
///
/// Nodes live in insertion order. A child can only be added under an
/// existing parent and parents are never reassigned, so the structure is a
/// tree by construction. [`seal`] freezes the topology once the
/// description pipeline has finished building it, which makes the
/// freeze-before-analysis precondition checkable instead of implicit.
///
/// [`seal`]: TypeHierarchy::seal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeHierarchy {
    nodes: Vec<HierarchyNode>,
    sealed: bool,
}

impl TypeHierarchy {
    /// Create a hierarchy containing only its root
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![HierarchyNode {
                name: root_name.into(),
                parent: None,
                children: Vec::new(),
            }],
            sealed: false,
        }
    }

    /// The root node
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a new node under `parent` and return its identity.
    ///
    /// Panics if the hierarchy has been sealed, or if `parent` was not
    /// minted by this hierarchy.
    pub fn add_node(&mut self, name: impl Into<String>, parent: NodeId) -> NodeId {
        assert!(!self.sealed, "topology is sealed");
        assert!(
            parent.index() < self.nodes.len(),
            "parent does not belong to this hierarchy"
        );
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(HierarchyNode {
            name: name.into(),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Freeze the topology; `add_node` is rejected afterwards
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Display name for diagnostics
    pub fn name(&self, node: NodeId) -> &str {
        &self.nodes[node.index()].name
    }

    /// Parent of `node`, `None` for the root
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].parent
    }

    /// All node identities, in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Hierarchy for TypeHierarchy {
    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].children
    }

    fn ancestry(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = vec![node];
        let mut current = node;
        while let Some(parent) = self.nodes[current.index()].parent {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }
}
