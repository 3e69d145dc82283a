//! Group scripts by module namespace.
//!
//! Two namespace families are recognised:
//! - `node:<module>` -> `deno_node`
//! - `ext:<namespace>/<path>` -> `<namespace>` (possibly empty)
//!
//! Any other named script is an error rather than an "other" bucket, since
//! silently dropping it would leave the percentages short of 100.

use super::metrics::percentage;
use crate::timeline::ScriptRecord;
use crate::utils::config::UNKNOWN_SCRIPT_NAME;
use crate::utils::error::AggregateError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

const NODE_PREFIX: &str = "node:";
const EXT_PREFIX: &str = "ext:";
const NODE_NAMESPACE: &str = "deno_node";
/// Label of the treemap root row
pub const CHART_ROOT: &str = "root";

/// One row of the namespace treemap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub label: String,
    pub parent: Option<String>,
    pub value: f64,
}

impl ChartRow {
    fn new(label: impl Into<String>, parent: Option<&str>, value: f64) -> Self {
        Self {
            label: label.into(),
            parent: parent.map(str::to_string),
            value,
        }
    }
}

/// Namespace of a script name
///
/// # Errors
/// * `AggregateError::UnrecognizedNamespace` - neither `node:` nor `ext:`
pub fn namespace_for(name: &str) -> Result<String, AggregateError> {
    if name.starts_with(NODE_PREFIX) {
        return Ok(NODE_NAMESPACE.to_string());
    }

    // `ext:/x.js` belongs to the empty namespace
    if let Some(rest) = name.strip_prefix(EXT_PREFIX) {
        let namespace = rest.split('/').next().unwrap_or_default();
        return Ok(namespace.to_string());
    }

    Err(AggregateError::UnrecognizedNamespace(name.to_string()))
}

/// Scripts that take part in namespace grouping
///
/// Unnamed scripts and scripts whose details carried no name are left out.
fn named_scripts(scripts: &[ScriptRecord]) -> impl Iterator<Item = (&ScriptRecord, &str)> {
    scripts.iter().filter_map(|s| {
        s.name
            .as_deref()
            .filter(|name| *name != UNKNOWN_SCRIPT_NAME)
            .map(|name| (s, name))
    })
}

/// Sum each namespace's share of total script time, in percent
///
/// # Errors
/// * `AggregateError::UnrecognizedNamespace` - a named script has no namespace
pub fn group_by_namespace(
    scripts: &[ScriptRecord],
    total_script_time: f64,
) -> Result<BTreeMap<String, f64>, AggregateError> {
    let mut groups = BTreeMap::new();

    for (script, name) in named_scripts(scripts) {
        let namespace = namespace_for(name)?;
        *groups.entry(namespace).or_insert(0.0) += percentage(script.elapsed, total_script_time);
    }

    Ok(groups)
}

/// Build treemap rows: the root, one row per namespace, one per script
///
/// `ext:` scripts are labelled by their path inside the namespace; a path
/// seen twice is prefixed with its namespace to keep labels unique.
pub fn build_chart_rows(scripts: &[ScriptRecord]) -> Result<Vec<ChartRow>, AggregateError> {
    let mut rows = vec![ChartRow::new(CHART_ROOT, None, 0.0)];
    let mut namespaces: Vec<String> = Vec::new();
    let mut script_rows = Vec::new();
    let mut seen_paths = HashSet::new();

    for (script, name) in named_scripts(scripts) {
        let namespace = namespace_for(name)?;
        if !namespaces.contains(&namespace) {
            namespaces.push(namespace.clone());
        }

        let label = match name.strip_prefix(EXT_PREFIX).and_then(|rest| rest.split_once('/')) {
            Some((ns, path)) => {
                if seen_paths.insert(path.to_string()) {
                    path.to_string()
                } else {
                    format!("{}/{}", ns, path)
                }
            }
            None => name.to_string(),
        };

        script_rows.push(ChartRow::new(label, Some(&namespace), script.elapsed));
    }

    rows.extend(
        namespaces
            .iter()
            .map(|ns| ChartRow::new(ns.as_str(), Some(CHART_ROOT), 0.0)),
    );
    rows.extend(script_rows);

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(id: u64, name: Option<&str>, elapsed: f64) -> ScriptRecord {
        ScriptRecord {
            id,
            timestamp: 0.0,
            elapsed,
            name: name.map(str::to_string),
            node_id: None,
        }
    }

    #[test]
    fn test_namespace_for() {
        assert_eq!(namespace_for("node:fs").unwrap(), "deno_node");
        assert_eq!(namespace_for("ext:deno_web/00_infra.js").unwrap(), "deno_web");
        assert_eq!(namespace_for("ext:core").unwrap(), "core");
    }

    #[test]
    fn test_unrecognized_namespace() {
        assert_eq!(
            namespace_for("file:///main.ts"),
            Err(AggregateError::UnrecognizedNamespace("file:///main.ts".to_string()))
        );
        assert!(namespace_for("ext").is_err());
    }

    #[test]
    fn test_ext_without_namespace_groups_under_empty() {
        assert_eq!(namespace_for("ext:/x.js").unwrap(), "");

        let scripts = vec![script(1, Some("ext:/x.js"), 3.0), script(2, Some("node:fs"), 1.0)];
        let groups = group_by_namespace(&scripts, 4.0).unwrap();
        assert_eq!(groups[""], 75.0);

        let rows = build_chart_rows(&scripts).unwrap();
        assert_eq!(rows[1].label, "");
        assert_eq!(rows[3].label, "x.js");
        assert_eq!(rows[3].parent.as_deref(), Some(""));
    }

    #[test]
    fn test_group_by_namespace() {
        let scripts = vec![
            script(1, Some("node:fs"), 2.0),
            script(2, Some("ext:deno_web/00_infra.js"), 5.0),
            script(3, Some("node:path"), 3.0),
            script(4, Some("Unknown"), 10.0),
            script(5, None, 10.0),
        ];

        let groups = group_by_namespace(&scripts, 20.0).unwrap();

        assert_eq!(groups.len(), 2);
        assert!((groups["deno_node"] - 25.0).abs() < 1e-9);
        assert!((groups["deno_web"] - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_group_by_namespace_fails_on_unknown_family() {
        let scripts = vec![script(1, Some("node:fs"), 1.0), script(2, Some("main.js"), 1.0)];
        assert!(matches!(
            group_by_namespace(&scripts, 2.0),
            Err(AggregateError::UnrecognizedNamespace(_))
        ));
    }

    #[test]
    fn test_build_chart_rows() {
        let scripts = vec![
            script(1, Some("ext:deno_web/00_infra.js"), 5.0),
            script(2, Some("node:fs"), 2.0),
            script(3, Some("ext:deno_url/00_infra.js"), 1.0),
        ];

        let rows = build_chart_rows(&scripts).unwrap();

        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "root",
                "deno_web",
                "deno_node",
                "deno_url",
                "00_infra.js",
                "node:fs",
                "deno_url/00_infra.js",
            ]
        );
        assert_eq!(rows[0].parent, None);
        assert_eq!(rows[1].parent.as_deref(), Some("root"));
        assert_eq!(rows[5].parent.as_deref(), Some("deno_node"));
        assert_eq!(rows[6].value, 1.0);
    }
}
