use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    if report.version != SCHEMA_VERSION {
        anyhow::bail!(
            "Unsupported schema version {} (expected {})",
            report.version,
            SCHEMA_VERSION
        );
    }

    let unresolved = report.tree.unresolved_children();
    if unresolved > 0 {
        anyhow::bail!("Report tree has {} child ids with no matching node", unresolved);
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Runs: {}", report.runs);
    println!("  Tree Nodes: {}", report.tree.count());
    println!("  Objects: {} ({:.3}ms total)", report.objects.len(), report.total_object_time);
    println!("  Scripts: {} ({:.3}ms total)", report.scripts.len(), report.total_script_time);
    println!("  Namespaces: {}", report.namespaces.len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Snapshot Trace Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  runs: number               - Event-log runs averaged");
        println!("  total_object_time: number  - Last minus first object timestamp (ms)");
        println!("  total_script_time: number  - Last minus first script timestamp (ms)");
        println!("  tree: object               - Deserialized object tree");
        println!("    nodes: array             - Nodes in id order, root first");
        println!("      id: string             - Node id, also the HTML anchor");
        println!("      name: string           - Rendered label");
        println!("      depth: number          - Depth, -1 for the root");
        println!("      children: array?       - Child node ids");
        println!("  objects: array             - Slowest objects");
        println!("    timestamp: number        - Boundary timestamp (ms)");
        println!("    data: string             - Pointer and description");
        println!("    duration: number         - Time since previous boundary (ms)");
        println!("    node_id: number          - First node of the object");
        println!("    script_id: number        - Script the object belongs to, -1 if none");
        println!("  scripts: array             - Slowest scripts");
        println!("    id: number               - Script id");
        println!("    timestamp: number        - Averaged deserialize timestamp (ms)");
        println!("    elapsed: number          - Time to deserialize (ms)");
        println!("    name: string?            - Script name");
        println!("    node_id: number?         - First node of the script's subtree");
        println!("  namespaces: object         - Percent of script time per namespace");
        println!("  chart: array               - Treemap rows (label, parent, value)");
        println!("  generated_at: string       - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Snapshot Trace Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Reconstructs V8 snapshot deserialization traces into timed object trees.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::write_report;
    use crate::parser::{ReportNode, ReportTree};
    use std::collections::BTreeMap;

    fn report(version: &str) -> crate::parser::Report {
        crate::parser::Report {
            version: version.to_string(),
            runs: 1,
            total_object_time: 0.0,
            total_script_time: 0.0,
            tree: ReportTree {
                nodes: vec![ReportNode {
                    id: "0".to_string(),
                    name: "root".to_string(),
                    depth: -1,
                    children: Vec::new(),
                }],
            },
            objects: Vec::new(),
            scripts: Vec::new(),
            namespaces: BTreeMap::new(),
            chart: Vec::new(),
            generated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_validate_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        write_report(&report(SCHEMA_VERSION), &path).unwrap();

        assert!(validate_report_file(path).is_ok());
    }

    #[test]
    fn test_validate_report_file_unresolved_child() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        let mut broken = report(SCHEMA_VERSION);
        broken.tree.nodes[0].children.push("9".to_string());
        write_report(&broken, &path).unwrap();

        assert!(validate_report_file(path).is_err());
    }

    #[test]
    fn test_validate_report_file_wrong_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        write_report(&report("0.1.0"), &path).unwrap();

        assert!(validate_report_file(path).is_err());
    }
}
