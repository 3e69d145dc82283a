//! Script load timeline.
//!
//! Deserialize events create records in trace order; details events attach
//! a name and the first tree node of the script's subtree. Details may come
//! before or after the matching deserialize event.

use super::correlator::EventMap;
use crate::tree::NodeId;
use crate::utils::config::{TIMESTAMP_SCALE, UNKNOWN_SCRIPT_NAME};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One script load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptRecord {
    pub id: u64,

    /// Averaged timestamp in ms
    pub timestamp: f64,

    /// Time to deserialize: ms since the previous script load
    pub elapsed: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// First tree node of this script's subtree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,
}

impl ScriptRecord {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_SCRIPT_NAME)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScriptTimeline {
    records: Vec<ScriptRecord>,
    by_id: HashMap<u64, usize>,
    pending: HashMap<u64, (String, NodeId)>,
    last_raw: Option<f64>,
}

impl ScriptTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a deserialize event using the averaged timestamp for `id`
    ///
    /// Returns false, with a warning, when no run has a timestamp for `id`.
    pub fn record_deserialize(&mut self, id: u64, events: &EventMap) -> bool {
        let Some(raw) = events.get(id) else {
            warn!("Script {} has no deserialize timestamp in the event logs, skipping", id);
            return false;
        };

        let elapsed = self
            .last_raw
            .map(|prev| (raw - prev) / TIMESTAMP_SCALE)
            .unwrap_or(0.0);
        self.last_raw = Some(raw);

        let mut record = ScriptRecord {
            id,
            timestamp: raw / TIMESTAMP_SCALE,
            elapsed,
            name: None,
            node_id: None,
        };

        if let Some((name, node_id)) = self.pending.remove(&id) {
            record.name = Some(name);
            record.node_id = Some(node_id);
        }

        self.by_id.insert(id, self.records.len());
        self.records.push(record);
        true
    }

    /// Attach a name and subtree start to script `id`
    ///
    /// `next_node` is the id the next parsed tree node will receive.
    pub fn record_details(&mut self, id: u64, name: &str, next_node: NodeId) {
        let name = if name.is_empty() {
            UNKNOWN_SCRIPT_NAME.to_string()
        } else {
            name.to_string()
        };

        match self.by_id.get(&id).and_then(|&i| self.records.get_mut(i)) {
            Some(record) => {
                debug!("+ {} ({:.3}ms)", name, record.elapsed);
                record.name = Some(name);
                record.node_id = Some(next_node);
            }
            None => {
                debug!("Details for script {} arrived before its deserialize event", id);
                self.pending.insert(id, (name, next_node));
            }
        }
    }

    /// Script id that object boundaries seen now belong to
    ///
    /// Objects are emitted before the script that triggers them finishes
    /// loading, so they bind to the id after the last completed script.
    pub fn upcoming_script_id(&self) -> i64 {
        let Some(last) = self.records.last() else {
            return -1;
        };

        match i64::try_from(last.id).ok().and_then(|id| id.checked_add(1)) {
            Some(next) => next,
            None => {
                warn!("Script id {} has no successor, objects stay unbound", last.id);
                -1
            }
        }
    }

    pub fn records(&self) -> &[ScriptRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ScriptRecord> {
        if !self.pending.is_empty() {
            debug!(
                "{} script details never matched a deserialize event",
                self.pending.len()
            );
        }
        self.records
    }
}
