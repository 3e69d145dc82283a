//! Output JSON schema definitions for report data.
//!
//! This module defines the structure handed to renderers and written to disk.
//! Schema is versioned to allow future evolution.

use crate::aggregator::ChartRow;
use crate::timeline::{ObjectRecord, ScriptRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Number of event-log runs the script timings were averaged over
    pub runs: usize,

    /// Last object timestamp minus the first, in ms
    pub total_object_time: f64,

    /// Last script timestamp minus the first, in ms
    pub total_script_time: f64,

    /// Deserialized object tree, without parent links
    pub tree: ReportTree,

    /// Slowest objects, descending by duration
    pub objects: Vec<ObjectRecord>,

    /// Slowest scripts, descending by time to deserialize
    pub scripts: Vec<ScriptRecord>,

    /// Share of total script time per namespace, in percent
    pub namespaces: BTreeMap<String, f64>,

    /// Treemap rows: label, parent, value
    pub chart: Vec<ChartRow>,

    /// Timestamp when report was generated
    pub generated_at: DateTime<Utc>,
}

/// The object tree as handed to renderers
///
/// Nodes are stored flat, root first, and link to their children by id.
/// There are no parent links and no nesting, so arbitrarily deep traces
/// serialize, deserialize and drop without recursion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportTree {
    pub nodes: Vec<ReportNode>,
}

/// A single tree node with a stringified id and rendered label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportNode {
    pub id: String,

    /// Rendered HTML label including backref markers
    pub name: String,

    pub depth: i64,

    /// Child ids in trace order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
}

impl ReportTree {
    pub fn root(&self) -> Option<&ReportNode> {
        self.nodes.first()
    }

    /// Look up a node by id
    ///
    /// Ids are dense arena indices, so this is a positional lookup checked
    /// against the stored id.
    pub fn get(&self, id: &str) -> Option<&ReportNode> {
        id.parse::<usize>()
            .ok()
            .and_then(|index| self.nodes.get(index))
            .filter(|node| node.id == id)
    }

    pub fn children<'a>(&'a self, node: &'a ReportNode) -> impl Iterator<Item = &'a ReportNode> + 'a {
        node.children.iter().filter_map(move |id| self.get(id))
    }

    /// Total number of nodes, including the root
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    /// Child ids that do not resolve to a node
    pub fn unresolved_children(&self) -> usize {
        self.nodes
            .iter()
            .flat_map(|node| node.children.iter())
            .filter(|id| self.get(id).is_none())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, depth: i64, children: &[&str]) -> ReportNode {
        ReportNode {
            id: id.to_string(),
            name: format!("n{}", id),
            depth,
            children: children.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_get_checks_stored_id() {
        let tree = ReportTree {
            nodes: vec![node("0", -1, &["1"]), node("7", 0, &[])],
        };

        assert_eq!(tree.get("0").unwrap().name, "n0");
        assert!(tree.get("1").is_none());
        assert!(tree.get("x").is_none());
        assert_eq!(tree.unresolved_children(), 1);
    }

    #[test]
    fn test_leaf_children_not_serialized() {
        let json = serde_json::to_value(node("3", 2, &[])).unwrap();
        assert!(json.get("children").is_none());
    }
}
