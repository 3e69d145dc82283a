//! Back-reference bookkeeping.
//!
//! A back-reference is a named slot: one node defines it, any number of
//! later `Backref` nodes point at it. Entries are created by whichever half
//! shows up first.

use super::arena::{NodeId, TraceTree};
use log::debug;
use std::collections::BTreeMap;

/// Definition and references for one back-reference name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BackrefEntry {
    pub name: String,
    pub defining_node: Option<NodeId>,

    /// References in discovery order; position is the marker index
    pub referencing_nodes: Vec<NodeId>,
}

impl BackrefEntry {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// `(index, node)` pairs for the markers rendered on the definition
    pub fn markers(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.referencing_nodes.iter().copied().enumerate()
    }

    pub fn is_dangling(&self) -> bool {
        self.defining_node.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BackrefTable {
    entries: BTreeMap<String, BackrefEntry>,
}

impl BackrefTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `node` as the definition of `name`; a later definition wins
    pub fn define(&mut self, tree: &mut TraceTree, name: &str, node: NodeId) {
        let entry = self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| BackrefEntry::new(name));

        if let Some(previous) = entry.defining_node.replace(node) {
            debug!("Backref {} redefined: node {} -> {}", name, previous, node);
        }

        if let Some(n) = tree.node_mut(node) {
            n.reference = Some(name.to_string());
        }
    }

    /// Append `node` to the references of `name`
    pub fn register_reference(&mut self, tree: &mut TraceTree, name: &str, node: NodeId) {
        self.entries
            .entry(name.to_string())
            .or_insert_with(|| BackrefEntry::new(name))
            .referencing_nodes
            .push(node);

        if let Some(n) = tree.node_mut(node) {
            n.backref = Some(name.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<&BackrefEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BackrefEntry> {
        self.entries.values()
    }

    /// Entries that were referenced but never defined
    pub fn dangling(&self) -> impl Iterator<Item = &BackrefEntry> {
        self.entries.values().filter(|e| e.is_dangling())
    }
}

/// Extract the target of a `Backref` node from its payload, e.g. `(@5)`
pub fn parse_backref_target(data: &str) -> Option<&str> {
    let token = data.split_whitespace().next()?;
    let name = token.strip_prefix('(')?.strip_suffix(')')?.trim();
    (!name.is_empty()).then_some(name)
}
