//! Classification of raw trace lines.
//!
//! Order matters: boundaries and script events are recognised before the
//! generic tree-node form, since a misread line would corrupt the depth
//! cursor for every sibling that follows.

use super::events::{parse_script_event, ScriptEvent};
use crate::utils::config::{BACKREF_DEFINITION_MARKER, IGNORED_NODE_PREFIXES};
use crate::utils::error::ParseError;
use serde::{Deserialize, Serialize};

/// How tree-node depth is written in the trace
///
/// Traces carry no version marker, so this is chosen out of band.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum DepthEncoding {
    /// Depth is the number of leading whitespace characters
    Indentation,

    /// Depth is a leading hexadecimal token before the name
    #[default]
    HexToken,
}

/// A tree-node line after depth extraction
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLine {
    pub depth: i64,
    pub name: String,
    pub data: String,
}

/// Classified trace line
#[derive(Debug, Clone, PartialEq)]
pub enum TraceLine {
    /// Blank lines, timestamp headers and noise events
    Ignore,

    /// `-- <timestamp> <payload>`
    ObjectBoundary { timestamp: f64, data: String },

    /// Lines starting with `script`
    ScriptEvent(ScriptEvent),

    /// `(set obj backref <name>)`
    BackrefDefinition { name: String },

    TreeNode(NodeLine),
}

/// Classify one raw (untrimmed) trace line
///
/// # Errors
/// * `ParseError::MalformedTrace` - a tree-node line has no valid depth or name
pub fn classify_line(raw: &str, encoding: DepthEncoding) -> Result<TraceLine, ParseError> {
    let line = raw.trim();

    if line.is_empty() || line.starts_with('[') {
        return Ok(TraceLine::Ignore);
    }

    if let Some(rest) = line.strip_prefix("--") {
        return Ok(parse_boundary(rest));
    }

    if line.starts_with("script") {
        return Ok(TraceLine::ScriptEvent(parse_script_event(line)));
    }

    if line.starts_with(BACKREF_DEFINITION_MARKER) {
        return parse_backref_definition(line);
    }

    parse_node_line(raw, encoding)
}

fn parse_boundary(rest: &str) -> TraceLine {
    let mut tokens = rest.split_whitespace();

    let timestamp = match tokens.next().map(str::parse::<f64>) {
        Some(Ok(ts)) if ts.is_finite() => ts,
        _ => return TraceLine::Ignore,
    };

    TraceLine::ObjectBoundary {
        timestamp,
        data: tokens.collect::<Vec<_>>().join(" "),
    }
}

fn parse_backref_definition(line: &str) -> Result<TraceLine, ParseError> {
    // (set obj backref <name>)
    let name = line
        .split_whitespace()
        .nth(3)
        .map(|token| token.trim_end_matches(')').trim())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ParseError::MalformedTrace(format!("backref without name: {}", line)))?;

    Ok(TraceLine::BackrefDefinition {
        name: name.to_string(),
    })
}

fn parse_node_line(raw: &str, encoding: DepthEncoding) -> Result<TraceLine, ParseError> {
    let line = raw.trim();
    let mut tokens = line.split_whitespace();

    let depth = match encoding {
        DepthEncoding::Indentation => raw.chars().take_while(|c| c.is_whitespace()).count() as i64,
        DepthEncoding::HexToken => {
            let token = tokens.next().unwrap_or_default();
            let digits = token.strip_prefix("0x").unwrap_or(token);
            u32::from_str_radix(digits, 16).map(i64::from).map_err(|e| {
                ParseError::MalformedTrace(format!("invalid depth '{}': {}", token, e))
            })?
        }
    };

    let name = tokens
        .next()
        .ok_or_else(|| ParseError::MalformedTrace(format!("missing node name: {}", line)))?;

    if IGNORED_NODE_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
        return Ok(TraceLine::Ignore);
    }

    let name = name.strip_prefix('-').unwrap_or(name);
    if name.is_empty() {
        return Err(ParseError::MalformedTrace(format!("empty node name: {}", line)));
    }

    Ok(TraceLine::TreeNode(NodeLine {
        depth,
        name: name.to_string(),
        data: tokens.collect::<Vec<_>>().join(" "),
    }))
}
