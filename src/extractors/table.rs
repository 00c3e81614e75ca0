// src/extractors/table.rs

// --- Imports ---
use crate::docx::node::{Children, Node, Role};
use crate::utils::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::fmt;

// --- Data Structures ---
/// A document table normalized into a header row and data rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTable {
    pub id: String,           // "table-0", "table-1", ... in document order
    pub title: String,        // "Table 1", "Table 2", ...
    pub headers: Vec<String>, // First content row of the table
    pub rows: Vec<Vec<String>>,
}

/// Why a node was skipped during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    MissingChildren,
    MalformedChildren,
    Unrecognised,
}

/// A node that could not be traversed. Anomalies never fail an
/// extraction; they only mean some content was not recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub tag: Option<String>,
    /// Number of enclosing `w:tbl` nodes at the point of the skip.
    pub table_depth: usize,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            AnomalyKind::MissingChildren => "has no children",
            AnomalyKind::MalformedChildren => "has children that are not a sequence",
            AnomalyKind::Unrecognised => "is not a recognisable node",
        };
        let tag = self.tag.as_deref().unwrap_or("<untagged>");
        if self.table_depth > 0 {
            write!(f, "{} {} (inside a table)", tag, what)
        } else {
            write!(f, "{} {}", tag, what)
        }
    }
}

/// Tables found in a document plus everything that had to be skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub tables: Vec<ExtractedTable>,
    pub anomalies: Vec<Anomaly>,
}

// Result of scanning one subtree: the raw row lists of every table in it,
// in pre-order, and the anomalies met on the way.
#[derive(Debug, Default)]
struct Scan {
    tables: Vec<Vec<Vec<String>>>,
    anomalies: Vec<Anomaly>,
}

impl Scan {
    fn merge(&mut self, other: Scan) {
        self.tables.extend(other.tables);
        self.anomalies.extend(other.anomalies);
    }
}

// --- Main Extractor Structure ---
pub struct TableExtractor;

impl TableExtractor {
    pub fn new() -> Self { Self {} }

    /// Extracts every table with a header row and at least one data row.
    #[allow(dead_code)]
    pub fn extract(&self, root: &Node) -> Result<Vec<ExtractedTable>, ExtractError> {
        self.extract_with_report(root).map(|extraction| extraction.tables)
    }

    /// Same as [`extract`](Self::extract), also returning the anomalies
    /// that were skipped so callers can tell when content went missing.
    pub fn extract_with_report(&self, root: &Node) -> Result<Extraction, ExtractError> {
        tracing::info!("Scanning node tree for tables");

        let scan = scan(root, 0);
        tracing::debug!("Found {} table nodes, {} anomalies", scan.tables.len(), scan.anomalies.len());

        let tables: Vec<ExtractedTable> = scan
            .tables
            .into_iter()
            .filter_map(split_header)
            .enumerate()
            .map(|(index, (headers, rows))| ExtractedTable {
                id: format!("table-{}", index),
                title: format!("Table {}", index + 1),
                headers,
                rows,
            })
            .collect();

        if !scan.anomalies.is_empty() {
            // Skipped content is not reported as an error
            tracing::warn!("Skipped {} malformed nodes while extracting tables", scan.anomalies.len());
        }

        if tables.is_empty() {
            tracing::error!("Traversal finished without a single valid table");
            return Err(ExtractError::NoTables);
        }

        tracing::info!("Extracted {} tables", tables.len());
        for table in &tables {
            tracing::debug!("{}: {} columns, {} data rows", table.id, table.headers.len(), table.rows.len());
        }

        Ok(Extraction { tables, anomalies: scan.anomalies })
    }
}

impl Default for TableExtractor {
    fn default() -> Self { Self::new() }
}

// --- Traversal ---

// Depth-first, pre-order walk over the whole tree. A table is recorded
// before any table nested in its cells. Every node is visited once, so
// this is the one place anomalies are noticed.
fn scan(node: &Node, table_depth: usize) -> Scan {
    let mut result = Scan::default();

    let children = match node {
        Node::Text(_) => return result,
        Node::Opaque => {
            result.anomalies.push(anomaly(AnomalyKind::Unrecognised, None, table_depth));
            return result;
        }
        Node::Element { tag, children } => match children {
            Children::List(list) => list,
            Children::Absent => {
                result.anomalies.push(anomaly(AnomalyKind::MissingChildren, Some(tag), table_depth));
                return result;
            }
            Children::Malformed => {
                result.anomalies.push(anomaly(AnomalyKind::MalformedChildren, Some(tag), table_depth));
                return result;
            }
        },
    };

    let mut depth = table_depth;
    if node.is(Role::Table) {
        result.tables.push(table_rows(children));
        depth += 1;
    }

    for child in children {
        result.merge(scan(child, depth));
    }
    result
}

fn anomaly(kind: AnomalyKind, tag: Option<&String>, table_depth: usize) -> Anomaly {
    let anomaly = Anomaly { kind, tag: tag.cloned(), table_depth };
    tracing::debug!("Skipping node: {}", anomaly);
    anomaly
}

/// Rows of a table, each as its list of cell texts. Rows without any
/// cell are dropped.
fn table_rows(table: &[Node]) -> Vec<Vec<String>> {
    table
        .iter()
        .filter(|n| n.is(Role::Row))
        .filter_map(Node::children)
        .map(row_cells)
        .filter(|cells| !cells.is_empty())
        .collect()
}

fn row_cells(row: &[Node]) -> Vec<String> {
    row.iter()
        .filter(|n| n.is(Role::Cell))
        .filter_map(Node::children)
        .map(cell_text)
        .collect()
}

/// Text of a cell: the literal text under paragraph -> run -> text,
/// concatenated in order and trimmed. Anything else in the cell
/// (properties, nested tables, hyperlinks) contributes nothing.
fn cell_text(cell: &[Node]) -> String {
    let text: String = children_with_role(cell, Role::Paragraph)
        .flat_map(|para| children_with_role(para, Role::Run))
        .flat_map(|run| children_with_role(run, Role::Text))
        .flat_map(|leaf| leaf.iter())
        .filter_map(|content| match content {
            Node::Text(s) => Some(s.as_str()),
            _ => None,
        })
        .collect();

    text.trim().to_string()
}

// Child sequences of the nodes in `nodes` that carry `role` and have one
fn children_with_role(nodes: &[Node], role: Role) -> impl Iterator<Item = &[Node]> {
    nodes
        .iter()
        .filter(move |n| n.is(role))
        .filter_map(Node::children)
}

fn split_header(mut rows: Vec<Vec<String>>) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    if rows.is_empty() {
        return None;
    }
    let headers = rows.remove(0);
    if headers.is_empty() || rows.is_empty() {
        tracing::debug!("Discarding table with {} header cells and {} data rows", headers.len(), rows.len());
        return None;
    }
    Some((headers, rows))
}
