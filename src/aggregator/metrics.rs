//! Rank objects and scripts by the time they cost.
//!
//! Slow objects and slow script loads are the primary targets when
//! shrinking snapshot startup time.

use crate::timeline::{ObjectRecord, ScriptRecord};
use log::debug;
use std::cmp::Ordering;

/// Ranked objects plus the total time they span
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRanking {
    /// Last object timestamp minus the first, in ms
    pub total_time: f64,

    /// Objects kept for display, descending by duration
    pub objects: Vec<ObjectRecord>,
}

/// Ranked scripts plus the total time they span
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptRanking {
    /// Last script timestamp minus the first, in ms
    pub total_time: f64,

    /// Scripts with positive time to deserialize, descending
    pub scripts: Vec<ScriptRecord>,
}

/// Rank objects by duration
///
/// **Public** - main entry point for object metrics
///
/// # Arguments
/// * `objects` - Object windows in trace order
/// * `threshold` - Keep objects with `duration > threshold` (ms)
/// * `fallback` - Number of objects kept when none pass the threshold
///
/// # Returns
/// Total object time and the kept objects, sorted by duration (descending)
pub fn rank_objects(mut objects: Vec<ObjectRecord>, threshold: f64, fallback: usize) -> ObjectRanking {
    if objects.is_empty() {
        objects.push(ObjectRecord::placeholder());
    }

    let total_time = span(objects.first().map(|o| o.timestamp), objects.last().map(|o| o.timestamp));

    objects.sort_by(|a, b| descending(a.duration, b.duration));

    let above = objects.iter().filter(|o| o.duration > threshold).count();
    debug!(
        "{} of {} objects exceed {}ms",
        above,
        objects.len(),
        threshold
    );

    // Sorted descending, so everything above the threshold is a prefix
    let keep = if above == 0 { fallback } else { above };
    objects.truncate(keep);

    ObjectRanking {
        total_time,
        objects,
    }
}

/// Rank scripts by time to deserialize
///
/// Scripts with zero or negative elapsed time are dropped; they come from
/// two loads sharing the same averaged timestamp, not from real work.
pub fn rank_scripts(mut scripts: Vec<ScriptRecord>) -> ScriptRanking {
    let total_time = span(scripts.first().map(|s| s.timestamp), scripts.last().map(|s| s.timestamp));

    scripts.sort_by(|a, b| descending(a.elapsed, b.elapsed));
    scripts.retain(|s| s.elapsed > 0.0);

    debug!("{} scripts with positive time to deserialize", scripts.len());

    ScriptRanking {
        total_time,
        scripts,
    }
}

/// `part` as a percentage of `total`, 0 when there is no total
pub fn percentage(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

fn span(first: Option<f64>, last: Option<f64>) -> f64 {
    match (first, last) {
        (Some(first), Some(last)) => last - first,
        _ => 0.0,
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
