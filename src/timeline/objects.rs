//! Heap object timeline built from `--` boundary markers.

use crate::tree::NodeId;
use serde::{Deserialize, Serialize};

/// Timing window for one deserialized heap object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub timestamp: f64,

    /// Raw boundary payload, usually `<pointer> <description>`
    pub data: String,

    /// ms since the previous boundary, 0 for the first
    pub duration: f64,

    /// First tree node after this boundary
    pub node_id: NodeId,

    /// Script about to load when this object was seen, -1 before any script
    pub script_id: i64,
}

impl ObjectRecord {
    /// Stand-in row for traces without any boundary markers
    pub fn placeholder() -> Self {
        Self {
            timestamp: 0.0,
            data: "No objects".to_string(),
            duration: 0.0,
            node_id: NodeId::ROOT,
            script_id: -1,
        }
    }

    /// Split the payload into its leading pointer and the rest
    pub fn pointer_and_description(&self) -> (&str, &str) {
        match self.data.split_once(' ') {
            Some((pointer, rest)) => (pointer, rest),
            None => (self.data.as_str(), ""),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObjectTimeline {
    records: Vec<ObjectRecord>,
}

impl ObjectTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, timestamp: f64, data: String, node_id: NodeId, script_id: i64) {
        let duration = self
            .records
            .last()
            .map(|prev| timestamp - prev.timestamp)
            .unwrap_or(0.0);

        self.records.push(ObjectRecord {
            timestamp,
            data,
            duration,
            node_id,
            script_id,
        });
    }

    pub fn records(&self) -> &[ObjectRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ObjectRecord> {
        self.records
    }
}
