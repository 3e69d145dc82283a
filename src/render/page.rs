//! Self-contained HTML report.
//!
//! Layout: slowest scripts, namespace shares and the namespace chart on the
//! left, the filterable object tree and slowest objects on the right. Every
//! tree node is an anchor, so script and object rows link straight into the
//! tree.

use super::labels::escape_html;
use crate::aggregator::{percentage, ChartRow, CHART_ROOT};
use crate::parser::{Report, ReportNode, ReportTree};
use log::info;
use std::collections::HashSet;

/// HTML page configuration
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub title: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Snapshot deserialization trace".to_string(),
        }
    }
}

impl PageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Generate the full HTML page for a report
pub fn generate_html(report: &Report, config: Option<&PageConfig>) -> String {
    let config = config.cloned().unwrap_or_default();
    info!(
        "Rendering HTML report: {} nodes, {} scripts, {} objects",
        report.tree.count(),
        report.scripts.len(),
        report.objects.len()
    );

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&config.title)));
    html.push_str(&format!("<style>{}</style>\n", STYLES));
    html.push_str("</head>\n<body>\n");

    html.push_str("<div class=\"column left\">\n");
    render_scripts_table(report, &mut html);
    render_namespaces_table(report, &mut html);
    render_chart(report, &mut html);
    html.push_str("</div>\n");

    html.push_str("<div class=\"column right\">\n");
    html.push_str("<input type=\"text\" id=\"search\" placeholder=\"Filter\">\n");
    html.push_str("<div class=\"tree\">\n<ul>\n");
    render_tree(&report.tree, &mut html);
    html.push_str("</ul>\n</div>\n<hr>\n");
    render_objects_table(report, &mut html);
    html.push_str("</div>\n");

    html.push_str(&format!("<script>{}</script>\n", SCRIPT));
    html.push_str(&format!(
        "<footer>schema v{} &middot; {} run(s) &middot; generated {}</footer>\n",
        escape_html(&report.version),
        report.runs,
        report.generated_at.to_rfc3339()
    ));
    html.push_str("</body>\n</html>\n");

    info!("HTML report generated ({} bytes)", html.len());
    html
}

fn render_scripts_table(report: &Report, out: &mut String) {
    out.push_str("<table class=\"scripts\">\n");
    out.push_str(
        "<tr><th>%</th><th><span title=\"time till deserialize\">TTD (ms)</span></th><th>Script</th></tr>\n",
    );
    out.push_str(&format!(
        "<tr><td>100.00</td><td>{:.3}</td><td>Total</td></tr>\n",
        report.total_script_time
    ));

    for script in &report.scripts {
        let link = match script.node_id {
            Some(node_id) => format!(
                r##" <a href="#{}" onclick="showScriptObjects(this, '{}')">[*]</a>"##,
                node_id, script.id
            ),
            None => String::new(),
        };
        out.push_str(&format!(
            "<tr><td>{:.2}</td><td>{:.3}</td><td>{}{}</td></tr>\n",
            percentage(script.elapsed, report.total_script_time),
            script.elapsed,
            escape_html(script.display_name()),
            link
        ));
    }

    out.push_str("</table>\n");
}

fn render_namespaces_table(report: &Report, out: &mut String) {
    if report.namespaces.is_empty() {
        return;
    }

    out.push_str("<hr>\n<table class=\"namespaces\">\n<tr><th>%</th><th>Namespace</th></tr>\n");

    let mut shares: Vec<(&String, &f64)> = report.namespaces.iter().collect();
    shares.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (namespace, share) in shares {
        out.push_str(&format!(
            "<tr><td>{:.3}</td><td>{}</td></tr>\n",
            share,
            escape_html(namespace)
        ));
    }

    out.push_str("</table>\n");
}

fn render_objects_table(report: &Report, out: &mut String) {
    out.push_str("<table class=\"objects\">\n");
    out.push_str(
        "<tr><th>%</th><th><span title=\"time till deserialize\">TTD (ms)</span></th><th>HeapObject</th></tr>\n",
    );
    out.push_str("<tbody id=\"contentArea\">\n");

    for object in &report.objects {
        let (pointer, description) = object.pointer_and_description();
        out.push_str(&format!(
            r##"<tr id="script-{}"><td>{:.2}</td><td>{:.3}</td><td><a href="#{}">{}</a> {}</td></tr>"##,
            object.script_id,
            percentage(object.duration, report.total_object_time),
            object.duration,
            object.node_id,
            escape_html(pointer),
            escape_html(description)
        ));
        out.push('\n');
    }

    out.push_str("</tbody>\n</table>\n");
}

/// Namespace treemap: one block per namespace, one cell per script,
/// both sized by time to deserialize
fn render_chart(report: &Report, out: &mut String) {
    let groups: Vec<&ChartRow> = report
        .chart
        .iter()
        .filter(|row| row.parent.as_deref() == Some(CHART_ROOT))
        .collect();

    if groups.is_empty() {
        return;
    }

    out.push_str("<hr>\n<div class=\"chart\">\n");

    for group in groups {
        let cells: Vec<&ChartRow> = report
            .chart
            .iter()
            .filter(|row| row.parent.as_deref() == Some(group.label.as_str()))
            .collect();
        let total: f64 = cells.iter().map(|cell| cell.value).sum();
        if total <= 0.0 {
            continue;
        }

        let label = escape_html(&group.label);
        let share = report.namespaces.get(&group.label).copied().unwrap_or(0.0);
        out.push_str(&format!(
            "<div class=\"chart-group\" style=\"flex-grow: {:.3}\" title=\"{} {:.3}%\">\n",
            total, label, share
        ));
        out.push_str(&format!(
            "<div class=\"chart-header\">{} {:.3}%</div>\n<div class=\"chart-cells\">\n",
            label, share
        ));

        for cell in cells {
            let name = escape_html(&cell.label);
            out.push_str(&format!(
                "<div class=\"chart-cell\" style=\"flex-grow: {:.3}\" title=\"{} {:.3}ms\">{}</div>\n",
                cell.value, name, cell.value, name
            ));
        }

        out.push_str("</div>\n</div>\n");
    }

    out.push_str("</div>\n");
}

enum TreeStep<'a> {
    Open(&'a ReportNode),
    Close,
}

/// Render the tree as nested lists using an explicit stack
///
/// Labels are already HTML, see render::labels. A node reachable twice is
/// rendered once.
fn render_tree(tree: &ReportTree, out: &mut String) {
    let Some(root) = tree.root() else {
        return;
    };

    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack = vec![TreeStep::Open(root)];

    while let Some(step) = stack.pop() {
        let node = match step {
            TreeStep::Close => {
                out.push_str("</ul></details></li>\n");
                continue;
            }
            TreeStep::Open(node) => node,
        };

        if !visited.insert(node.id.as_str()) {
            continue;
        }

        out.push_str(&format!("<li id=\"{}\">", escape_html(&node.id)));

        let children: Vec<&ReportNode> = tree.children(node).collect();
        if children.is_empty() {
            out.push_str(&format!("<span class=\"leaf\">{}</span></li>\n", node.name));
        } else {
            out.push_str(&format!("<details open><summary>{}</summary><ul>\n", node.name));
            stack.push(TreeStep::Close);
            stack.extend(children.into_iter().rev().map(TreeStep::Open));
        }
    }
}

const STYLES: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; display: flex; }
.column { height: 100vh; overflow: auto; padding: 8px; box-sizing: border-box; }
.left { width: 40%; border-right: 1px solid #ddd; }
.right { flex: 1; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ddd; padding: 4px 8px; text-align: left; font-size: 0.9em; }
th { background-color: #4a90d9; color: white; }
tr:hover { background-color: #f0f0f0; }
.tree ul { list-style: none; padding-left: 16px; margin: 0; font-family: monospace; }
.tree li:target > details > summary, .tree li:target > .leaf { background-color: yellow; }
.dangling { color: #cc0000; }
.flright { float: right; }
.src { font-size: 0.5em; }
#search { width: 100%; box-sizing: border-box; margin-bottom: 8px; padding: 4px; }
.chart { display: flex; height: 240px; gap: 2px; font-size: 0.75em; }
.chart-group { display: flex; flex-direction: column; flex-basis: 0; min-width: 0; background-color: #ee8100; }
.chart-header { padding: 2px 4px; color: white; white-space: nowrap; overflow: hidden; }
.chart-cells { flex: 1; display: flex; flex-direction: column; gap: 1px; }
.chart-cell { flex-basis: 0; min-height: 0; overflow: hidden; padding: 0 4px; background-color: #f7f7f7; }
.chart-cell:hover { background-color: #9ebcda; }
footer { position: fixed; bottom: 0; right: 8px; font-size: 0.7em; color: #888; }
"#;

const SCRIPT: &str = r##"
let currentScriptNode = null;
function showScriptObjects(el, scriptId) {
  if (currentScriptNode === el) {
    el.parentElement.parentElement.style.backgroundColor = "";
    el.textContent = "[*]";
    currentScriptNode = null;
  } else {
    if (currentScriptNode !== null) {
      currentScriptNode.textContent = "[*]";
      currentScriptNode.parentElement.parentElement.style.backgroundColor = "";
    }
    el.parentElement.parentElement.style.backgroundColor = "yellow";
    el.textContent = "[v]";
    currentScriptNode = el;
  }
  document.querySelectorAll("#contentArea tr").forEach(function (row) {
    const visible = currentScriptNode === null || row.id === "script-" + scriptId;
    row.style.display = visible ? "table-row" : "none";
  });
}

function filterTree(keyword) {
  const needle = keyword.toLowerCase();
  const items = document.querySelectorAll(".tree li");
  items.forEach(function (li) {
    li.style.display = needle ? "none" : "";
  });
  if (!needle) {
    return;
  }
  items.forEach(function (li) {
    const label = li.querySelector(":scope > details > summary, :scope > .leaf");
    if (!label || !label.textContent.toLowerCase().includes(needle)) {
      return;
    }
    let el = li;
    while (el && el.style.display === "none") {
      el.style.display = "";
      const details = el.querySelector(":scope > details");
      if (details) {
        details.open = true;
      }
      el = el.parentElement.closest("li");
    }
  });
}

let unfiltered = true;
document.querySelector("#search").addEventListener("keyup", function (e) {
  const keyword = e.target.value;
  if (keyword && e.key === "Enter") {
    unfiltered = false;
    filterTree(keyword);
  } else if (!keyword && !unfiltered) {
    filterTree("");
    unfiltered = true;
  }
});
"##;
