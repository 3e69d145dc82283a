//! Averaging of script deserialize timestamps across repeated runs.
//!
//! Every run writes its own event log. Run 0 is the baseline: each of its
//! script ids must appear in every other run, otherwise the mean would be
//! taken over a different number of samples per id.

use crate::parser::events::parse_event_line;
use crate::utils::error::CorrelationError;
use log::debug;
use std::collections::BTreeMap;

/// `script id -> deserialize timestamp` for a single run
pub type EventLog = BTreeMap<u64, f64>;

/// Averaged `script id -> timestamp` across all runs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventMap {
    timestamps: BTreeMap<u64, f64>,
    runs: usize,
}

impl EventMap {
    pub fn get(&self, id: u64) -> Option<f64> {
        self.timestamps.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Number of runs the averages were taken over
    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.timestamps.iter().map(|(id, ts)| (*id, *ts))
    }
}

impl FromIterator<(u64, f64)> for EventMap {
    /// Build a single-run map directly from `(id, timestamp)` pairs
    fn from_iter<I: IntoIterator<Item = (u64, f64)>>(iter: I) -> Self {
        Self {
            timestamps: iter.into_iter().collect(),
            runs: 1,
        }
    }
}

/// Parse one run's event log
///
/// Lines other than `script,deserialize,<id>,<timestamp>` are skipped.
/// A repeated id keeps its last timestamp.
pub fn parse_event_log(text: &str) -> EventLog {
    let log: EventLog = text.lines().filter_map(parse_event_line).collect();
    debug!("Parsed event log with {} deserialize events", log.len());
    log
}

/// Average the baseline ids over all runs
///
/// # Errors
/// * `CorrelationError::NoRuns` - `logs` is empty
/// * `CorrelationError::MissingCorrelationData` - a baseline id is missing from a run
pub fn correlate(logs: &[EventLog]) -> Result<EventMap, CorrelationError> {
    let (baseline, rest) = logs.split_first().ok_or(CorrelationError::NoRuns)?;
    let runs = logs.len();

    let mut timestamps = BTreeMap::new();
    for (&id, &first) in baseline {
        let mut sum = first;
        for (offset, log) in rest.iter().enumerate() {
            let ts = log
                .get(&id)
                .ok_or(CorrelationError::MissingCorrelationData {
                    id,
                    run: offset + 1,
                })?;
            sum += ts;
        }
        timestamps.insert(id, sum / runs as f64);
    }

    debug!(
        "Correlated {} script timestamps across {} runs",
        timestamps.len(),
        runs
    );

    Ok(EventMap { timestamps, runs })
}
