//! Rendering of reconstructed traces for people.
//!
//! - Node labels with back-reference markers, and the parent-free report tree
//! - A self-contained HTML page
//! - A terminal text summary

pub mod labels;
pub mod page;
pub mod summary;

// Re-export main types
pub use labels::{build_report_tree, escape_html, node_label};
pub use page::{generate_html, PageConfig};
pub use summary::generate_text_summary;
