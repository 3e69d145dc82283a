//! Arena-backed trace tree.
//!
//! Nodes live in a single `Vec` and refer to each other by `NodeId`.
//! Parent links are indices, so the tree has no ownership cycles and can be
//! converted into a parent-free report tree at handoff.

use crate::utils::error::ParseError;
use serde::{Deserialize, Serialize};

/// Index of a node in the arena, also its display id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single deserialized object (or bytecode) in the trace
#[derive(Debug, Clone, PartialEq)]
pub struct TraceNode {
    pub id: NodeId,
    pub name: String,

    /// Raw trailing payload of the line
    pub data: String,

    /// Parse-derived depth, -1 for the root
    pub depth: i64,

    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,

    /// Back-reference name this node defines
    pub reference: Option<String>,

    /// Back-reference name this node points to
    pub backref: Option<String>,
}

impl TraceNode {
    fn new(id: NodeId, name: String, data: String, depth: i64, parent: Option<NodeId>) -> Self {
        Self {
            id,
            name,
            data,
            depth,
            children: Vec::new(),
            parent,
            reference: None,
            backref: None,
        }
    }
}

/// Rooted ordered tree built in trace order
///
/// `open` holds the path from the root to the cursor, so finding the parent
/// of a new node is a pop from the end instead of a walk up parent links.
#[derive(Debug, Clone)]
pub struct TraceTree {
    nodes: Vec<TraceNode>,
    open: Vec<NodeId>,
}

impl Default for TraceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceTree {
    pub fn new() -> Self {
        let root = TraceNode::new(NodeId::ROOT, "root".to_string(), String::new(), -1, None);
        Self {
            nodes: vec![root],
            open: vec![NodeId::ROOT],
        }
    }

    /// Insert a node below the deepest open ancestor shallower than `depth`
    ///
    /// The new node becomes the cursor.
    ///
    /// # Errors
    /// * `ParseError::InvariantViolation` - the walk would pop the root
    pub fn insert(
        &mut self,
        depth: i64,
        name: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<NodeId, ParseError> {
        let keep = self
            .open
            .iter()
            .rposition(|open| self.nodes[open.0].depth < depth)
            .ok_or_else(|| {
                ParseError::InvariantViolation(format!("depth {} would pop past the root", depth))
            })?;
        self.open.truncate(keep + 1);
        let parent = self.open[keep];

        let id = self.next_id();
        self.nodes
            .push(TraceNode::new(id, name.into(), data.into(), depth, Some(parent)));
        self.nodes[parent.0].children.push(id);
        self.open.push(id);

        Ok(id)
    }

    /// The id the next inserted node will receive
    pub fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len())
    }

    /// Most recently inserted node still open (the root before any insert)
    pub fn cursor(&self) -> NodeId {
        self.open.last().copied().unwrap_or(NodeId::ROOT)
    }

    pub fn root(&self) -> &TraceNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> Option<&TraceNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut TraceNode> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes, excluding the root
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All nodes in id order, root first
    pub fn iter(&self) -> impl Iterator<Item = &TraceNode> {
        self.nodes.iter()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &TraceNode> {
        self.node(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |child| self.node(*child))
    }

    /// Maximum depth of any node, -1 for an empty tree
    pub fn max_depth(&self) -> i64 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(-1)
    }
}
