//! Script event grammar shared by the trace and the per-run event logs.
//!
//! Script events are comma separated:
//! - `script,deserialize,<id>,<timestamp>`
//! - `script-details,<id>,<name>` (also accepted as `script,script-details,<id>,<name>`)

use log::debug;

/// A parsed script event line
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptEvent {
    /// A script finished deserializing
    Deserialize { id: u64, timestamp: Option<f64> },

    /// Declares the name of a script
    Details { id: u64, name: String },

    /// Any other script sub-event (create, compile, ...)
    Other,
}

/// Parse a trimmed line that starts with `script`
pub fn parse_script_event(line: &str) -> ScriptEvent {
    let fields: Vec<&str> = line.split(',').collect();

    match fields.as_slice() {
        ["script", "deserialize", id, rest @ ..] => match parse_id(id) {
            Some(id) => ScriptEvent::Deserialize {
                id,
                timestamp: rest.first().and_then(|ts| ts.trim().parse::<f64>().ok()),
            },
            None => ScriptEvent::Other,
        },
        ["script-details", id, name @ ..] | ["script", "script-details", id, name @ ..] => {
            match parse_id(id) {
                Some(id) => ScriptEvent::Details {
                    id,
                    name: name.join(",").trim().to_string(),
                },
                None => ScriptEvent::Other,
            }
        }
        _ => ScriptEvent::Other,
    }
}

/// Parse one line of a per-run event log into `(id, timestamp)`
///
/// Only `script,deserialize` events with a numeric timestamp are kept.
pub fn parse_event_line(line: &str) -> Option<(u64, f64)> {
    let line = line.trim();
    if !line.starts_with("script") {
        return None;
    }

    match parse_script_event(line) {
        ScriptEvent::Deserialize {
            id,
            timestamp: Some(timestamp),
        } => Some((id, timestamp)),
        _ => None,
    }
}

fn parse_id(field: &str) -> Option<u64> {
    match field.trim().parse::<u64>() {
        Ok(id) => Some(id),
        Err(e) => {
            debug!("Ignoring script event with bad id '{}': {}", field, e);
            None
        }
    }
}
