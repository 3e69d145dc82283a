//! Aggregation of timelines into ranked tables and namespace shares.
//!
//! This module transforms parsed timelines into:
//! - Top objects by duration (threshold with top-N fallback)
//! - Top scripts by time to deserialize
//! - Namespace percentages and treemap rows

pub mod metrics;
pub mod namespace;

use crate::timeline::{ObjectRecord, ScriptRecord};
use crate::utils::config::ReportConfig;
use crate::utils::error::AggregateError;
use log::debug;
use std::collections::BTreeMap;

// Re-export main types and functions
pub use metrics::{percentage, rank_objects, rank_scripts, ObjectRanking, ScriptRanking};
pub use namespace::{build_chart_rows, group_by_namespace, namespace_for, ChartRow, CHART_ROOT};

/// Everything the report needs besides the tree
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub total_object_time: f64,
    pub total_script_time: f64,
    pub objects: Vec<ObjectRecord>,
    pub scripts: Vec<ScriptRecord>,
    pub namespaces: BTreeMap<String, f64>,
    pub chart: Vec<ChartRow>,
}

/// Rank objects and scripts and group scripts by namespace
///
/// # Errors
/// * `AggregateError::UnrecognizedNamespace` - a script name has no known namespace
pub fn aggregate(
    objects: Vec<ObjectRecord>,
    scripts: Vec<ScriptRecord>,
    config: &ReportConfig,
) -> Result<Aggregate, AggregateError> {
    let objects = rank_objects(objects, config.object_threshold_ms, config.fallback_objects);
    let scripts = rank_scripts(scripts);

    let namespaces = group_by_namespace(&scripts.scripts, scripts.total_time)?;
    let chart = build_chart_rows(&scripts.scripts)?;

    debug!(
        "Aggregated {} objects ({:.3}ms) and {} scripts ({:.3}ms) in {} namespaces",
        objects.objects.len(),
        objects.total_time,
        scripts.scripts.len(),
        scripts.total_time,
        namespaces.len()
    );

    Ok(Aggregate {
        total_object_time: objects.total_time,
        total_script_time: scripts.total_time,
        objects: objects.objects,
        scripts: scripts.scripts,
        namespaces,
        chart,
    })
}
