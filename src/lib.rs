//! Snapshot Trace Studio
//!
//! Reconstructs V8 snapshot deserialization traces into a timed object
//! tree, averages script load times over repeated runs, and reports the
//! slowest objects, scripts and namespaces.
//!
//! This crate provides the core implementation for the
//! `snapshot-trace` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! snapshot-trace report --trace trace.txt --events events --runs 10 --summary
//! ```
//!
//! ## Pipeline
//!
//! ```ignore
//! let events = correlate(&logs)?;
//! let parsed = parse_trace(&text, &events, DepthEncoding::HexToken)?;
//! let aggregate = aggregate(parsed.objects.clone(), parsed.scripts.clone(), &config)?;
//! let report = to_report(&parsed, aggregate, events.runs());
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod render;
pub mod timeline;
pub mod tree;
pub mod utils;
