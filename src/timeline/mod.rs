//! Timing reconstruction: run correlation, script loads and object windows.

pub mod correlator;
pub mod objects;
pub mod scripts;

pub use correlator::{correlate, parse_event_log, EventLog, EventMap};
pub use objects::{ObjectRecord, ObjectTimeline};
pub use scripts::{ScriptRecord, ScriptTimeline};
