//! Trace parsing and schema definitions.
//!
//! This module handles:
//! - Classifying raw trace lines
//! - Parsing script events shared with the per-run event logs
//! - Driving the single pass that builds the tree and timelines
//! - Defining output schema

pub mod events;
pub mod line;
pub mod schema;
pub mod trace;

// Re-export main types
pub use events::{parse_event_line, parse_script_event, ScriptEvent};
pub use line::{classify_line, DepthEncoding, NodeLine, TraceLine};
pub use schema::{Report, ReportNode, ReportTree};
pub use trace::{parse_trace, to_report, ParseContext, ParseStats, ParsedTrace};
