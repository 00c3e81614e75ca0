// src/utils/tree_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;
use crate::docx::node::{Children, Node, Role};
use crate::extractors::table::Anomaly;
use crate::utils::error::AppError;

const TEXT_PREVIEW_CHARS: usize = 40;

/// Renders an indented outline of a node tree. Table structure is
/// marked so skipped rows and cells stand out.
pub fn render_outline(root: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, root, 0);
    out
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Text(text) => {
            if text.trim().is_empty() {
                return; // Formatting whitespace between elements
            }
            let preview: String = text.chars().take(TEXT_PREVIEW_CHARS).collect();
            let ellipsis = if text.chars().count() > TEXT_PREVIEW_CHARS { "..." } else { "" };
            out.push_str(&format!("{}\"{}{}\"\n", indent, preview, ellipsis));
        }
        Node::Opaque => out.push_str(&format!("{}<unrecognised node>\n", indent)),
        Node::Element { tag, children } => {
            let marker = match Role::from_tag(tag) {
                Role::Table => " [table]",
                Role::Row => " [row]",
                Role::Cell => " [cell]",
                _ => "",
            };
            let note = match children {
                Children::List(_) => "",
                Children::Absent => " (no children)",
                Children::Malformed => " (malformed children)",
            };
            out.push_str(&format!("{}<{}>{}{}\n", indent, tag, marker, note));
            if let Children::List(list) = children {
                for child in list {
                    write_node(out, child, depth + 1);
                }
            }
        }
    }
}

/// Writes the outline of `root` and the list of skipped nodes to a file.
pub fn save_node_outline(root: &Node, anomalies: &[Anomaly], filename: &Path) -> Result<(), AppError> {
    let mut file = File::create(filename)?;

    let mut report = render_outline(root);
    report.push_str(&format!("\n# {} skipped nodes\n", anomalies.len()));
    for anomaly in anomalies {
        report.push_str(&format!("- {}\n", anomaly));
    }

    file.write_all(report.as_bytes())?;

    tracing::info!("Saved node tree outline to {}", filename.display());
    Ok(())
}
