//! Single-pass trace parser.
//!
//! Walks the trace text once, routing each classified line to the tree
//! builder, the back-reference table, or one of the timelines. All mutable
//! state lives in a `ParseContext`, so a parse never touches globals and
//! fragments can be parsed in isolation.

use super::line::{classify_line, DepthEncoding, NodeLine, TraceLine};
use super::events::ScriptEvent;
use super::schema::Report;
use crate::aggregator::Aggregate;
use crate::render::build_report_tree;
use crate::timeline::{EventMap, ObjectRecord, ObjectTimeline, ScriptRecord, ScriptTimeline};
use crate::tree::{parse_backref_target, BackrefTable, TraceTree};
use crate::utils::config::{BACKREF_NODE_NAME, SCHEMA_VERSION};
use crate::utils::error::ParseError;
use log::{debug, warn};

/// Line counts collected during a parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    pub nodes: usize,
    pub ignored: usize,
    pub malformed: usize,
    pub boundaries: usize,
    pub script_events: usize,
    pub backref_definitions: usize,
}

/// Everything reconstructed from one trace
#[derive(Debug, Clone)]
pub struct ParsedTrace {
    pub tree: TraceTree,
    pub backrefs: BackrefTable,

    /// Script loads in trace order
    pub scripts: Vec<ScriptRecord>,

    /// Object windows in trace order
    pub objects: Vec<ObjectRecord>,

    pub stats: ParseStats,
}

/// Mutable state threaded through the trace pass
pub struct ParseContext<'a> {
    events: &'a EventMap,
    encoding: DepthEncoding,
    tree: TraceTree,
    backrefs: BackrefTable,
    scripts: ScriptTimeline,
    objects: ObjectTimeline,
    stats: ParseStats,
}

impl<'a> ParseContext<'a> {
    pub fn new(events: &'a EventMap, encoding: DepthEncoding) -> Self {
        Self {
            events,
            encoding,
            tree: TraceTree::new(),
            backrefs: BackrefTable::new(),
            scripts: ScriptTimeline::new(),
            objects: ObjectTimeline::new(),
            stats: ParseStats::default(),
        }
    }

    /// Process one raw trace line
    ///
    /// Malformed lines are logged and skipped without consuming a node id.
    ///
    /// # Errors
    /// * `ParseError::InvariantViolation` - the tree could not place a node
    pub fn feed_line(&mut self, raw: &str) -> Result<(), ParseError> {
        self.stats.lines += 1;

        let line = match classify_line(raw, self.encoding) {
            Ok(line) => line,
            Err(e) => {
                debug!("Skipping line {}: {}", self.stats.lines, e);
                self.stats.malformed += 1;
                return Ok(());
            }
        };

        match line {
            TraceLine::Ignore => self.stats.ignored += 1,
            TraceLine::ObjectBoundary { timestamp, data } => {
                self.stats.boundaries += 1;
                self.objects.record(
                    timestamp,
                    data,
                    self.tree.next_id(),
                    self.scripts.upcoming_script_id(),
                );
            }
            TraceLine::ScriptEvent(event) => {
                self.stats.script_events += 1;
                self.on_script_event(event);
            }
            TraceLine::BackrefDefinition { name } => {
                self.stats.backref_definitions += 1;
                let cursor = self.tree.cursor();
                self.backrefs.define(&mut self.tree, &name, cursor);
            }
            TraceLine::TreeNode(node) => self.on_node(node)?,
        }

        Ok(())
    }

    fn on_script_event(&mut self, event: ScriptEvent) {
        match event {
            ScriptEvent::Deserialize { id, .. } => {
                self.scripts.record_deserialize(id, self.events);
            }
            ScriptEvent::Details { id, name } => {
                self.scripts.record_details(id, &name, self.tree.next_id());
            }
            ScriptEvent::Other => {}
        }
    }

    fn on_node(&mut self, node: NodeLine) -> Result<(), ParseError> {
        let target = (node.name == BACKREF_NODE_NAME)
            .then(|| parse_backref_target(&node.data).map(str::to_string))
            .flatten();

        let id = self.tree.insert(node.depth, node.name, node.data)?;
        self.stats.nodes += 1;

        if let Some(name) = target {
            self.backrefs.register_reference(&mut self.tree, &name, id);
        }

        Ok(())
    }

    pub fn finish(self) -> ParsedTrace {
        let dangling = self.backrefs.dangling().count();
        if dangling > 0 {
            warn!("{} back-references were never defined", dangling);
        }

        ParsedTrace {
            tree: self.tree,
            backrefs: self.backrefs,
            scripts: self.scripts.into_records(),
            objects: self.objects.into_records(),
            stats: self.stats,
        }
    }
}

/// Parse a complete trace
///
/// **Public** - main entry point for parsing
///
/// # Arguments
/// * `text` - Full trace text
/// * `events` - Averaged script timestamps from the event logs
/// * `encoding` - How node depth is written in this trace
///
/// # Returns
/// Tree, back-references and timelines ready for aggregation
///
/// # Errors
/// * `ParseError::InvariantViolation` - the tree could not place a node
pub fn parse_trace(
    text: &str,
    events: &EventMap,
    encoding: DepthEncoding,
) -> Result<ParsedTrace, ParseError> {
    let mut ctx = ParseContext::new(events, encoding);
    for line in text.lines() {
        ctx.feed_line(line)?;
    }

    let parsed = ctx.finish();
    debug!(
        "Parsed {} lines: {} nodes, {} objects, {} scripts, {} malformed",
        parsed.stats.lines,
        parsed.stats.nodes,
        parsed.objects.len(),
        parsed.scripts.len(),
        parsed.stats.malformed
    );

    Ok(parsed)
}

/// Convert a parsed trace and its aggregate into the output report
///
/// **Public** - used by commands to create final output
pub fn to_report(parsed: &ParsedTrace, aggregate: Aggregate, runs: usize) -> Report {
    use chrono::Utc;

    Report {
        version: SCHEMA_VERSION.to_string(),
        runs,
        total_object_time: aggregate.total_object_time,
        total_script_time: aggregate.total_script_time,
        tree: build_report_tree(&parsed.tree, &parsed.backrefs),
        objects: aggregate.objects,
        scripts: aggregate.scripts,
        namespaces: aggregate.namespaces,
        chart: aggregate.chart,
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeId;

    fn no_events() -> EventMap {
        EventMap::default()
    }

    #[test]
    fn test_ignored_lines_do_not_consume_ids() {
        let text = "[0.1] header\n0 A\n\n1 heap-capacity 100\nzz bad\n1 B";
        let parsed = parse_trace(text, &no_events(), DepthEncoding::HexToken).unwrap();

        let ids: Vec<usize> = parsed.tree.iter().skip(1).map(|n| n.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(parsed.stats.malformed, 1);
        assert_eq!(parsed.stats.nodes, 2);
    }

    #[test]
    fn test_backref_definition_applies_to_cursor() {
        let text = "0 NewObject\n(set obj backref @3)\n1 Backref (@3)";
        let parsed = parse_trace(text, &no_events(), DepthEncoding::HexToken).unwrap();

        let entry = parsed.backrefs.get("@3").unwrap();
        assert_eq!(entry.defining_node, Some(NodeId(1)));
        assert_eq!(entry.referencing_nodes, vec![NodeId(2)]);
    }

    #[test]
    fn test_object_binds_to_upcoming_script() {
        let events: EventMap = [(4, 2000.0)].into_iter().collect();
        let text = "-- 1.0 first\n0 A\nscript,deserialize,4,2000\n-- 2.0 second\n0 B";
        let parsed = parse_trace(text, &events, DepthEncoding::HexToken).unwrap();

        assert_eq!(parsed.objects[0].script_id, -1);
        assert_eq!(parsed.objects[0].node_id, NodeId(1));
        assert_eq!(parsed.objects[1].script_id, 5);
        assert_eq!(parsed.objects[1].node_id, NodeId(2));
    }

    #[test]
    fn test_script_details_point_at_next_node() {
        let events: EventMap = [(1, 1000.0)].into_iter().collect();
        let text = "script,deserialize,1,1000\n0 A\nscript-details,1,node:fs\n0 B\n1 C";
        let parsed = parse_trace(text, &events, DepthEncoding::HexToken).unwrap();

        assert_eq!(parsed.scripts[0].name.as_deref(), Some("node:fs"));
        assert_eq!(parsed.scripts[0].node_id, Some(NodeId(2)));
    }
}
