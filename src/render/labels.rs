//! Node labels and the parent-free report tree.
//!
//! Labels are HTML fragments: the escaped name and payload, one `[i]`
//! marker per reference on a back-reference definition, a link back to the
//! definition on each reference, and a source link for well-known bytecodes.

use crate::parser::{ReportNode, ReportTree};
use crate::tree::{BackrefTable, NodeId, TraceNode, TraceTree};
use crate::utils::config::{DESERIALIZER_SOURCE_LINES, DESERIALIZER_SOURCE_ROOT};

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render the label of a single node
pub fn node_label(node: &TraceNode, backrefs: &BackrefTable) -> String {
    let mut label = escape_html(&node.name);
    if !node.data.is_empty() {
        label.push(' ');
        label.push_str(&escape_html(&node.data));
    }

    if let Some(name) = &node.reference {
        // Only the live definition carries the markers
        let entry = backrefs
            .get(name)
            .filter(|e| e.defining_node == Some(node.id) && !e.referencing_nodes.is_empty());

        if let Some(entry) = entry {
            let markers: String = entry
                .markers()
                .map(|(index, referrer)| format!(r##"<sup><a href="#{}">[{}]</a></sup>"##, referrer, index))
                .collect();
            label.push_str(&format!(
                r#"<span id="backref-{}">{}</span>"#,
                escape_html(name),
                markers
            ));
        }
    }

    if let Some(target) = &node.backref {
        let defined = backrefs.get(target).is_some_and(|e| !e.is_dangling());
        let name = escape_html(target);

        if defined {
            label.push_str(&format!(r##" <a href="#backref-{0}">(backref {0})</a>"##, name));
        } else {
            label.push_str(&format!(r#" <span class="dangling">(backref {})</span>"#, name));
        }
    }

    if let Some((_, line)) = DESERIALIZER_SOURCE_LINES
        .iter()
        .find(|(bytecode, _)| *bytecode == node.name)
    {
        label.push_str(&format!(
            r#" <a class="flright" target="_blank" href="{}#{}"><span class="src">[src]</span></a>"#,
            DESERIALIZER_SOURCE_ROOT, line
        ));
    }

    label
}

/// Convert the arena into a parent-free report tree with rendered labels
pub fn build_report_tree(tree: &TraceTree, backrefs: &BackrefTable) -> ReportTree {
    let nodes = tree
        .iter()
        .map(|node| ReportNode {
            id: node.id.to_string(),
            name: node_label(node, backrefs),
            depth: node.depth,
            children: node.children.iter().map(NodeId::to_string).collect(),
        })
        .collect();

    ReportTree { nodes }
}
