// src/docx/loader.rs
use crate::docx::node::{Children, Node};
use crate::utils::error::DocumentError;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_PART: &str = "word/document.xml";

/// A document read from disk, with its node tree materialized in memory.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub file_name: String,
    pub size_bytes: u64,
    pub root: Node,
}

impl LoadedDocument {
    /// File name without its extension, used to name output directories.
    pub fn stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }
}

/// Rejects anything whose name does not end in the expected suffix.
/// Only the name is checked, never the content.
fn validate_suffix(path: &Path, suffix: &str) -> Result<String, DocumentError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !name.to_lowercase().ends_with(suffix) {
        tracing::warn!("Rejected '{}': expected a {} file", name, suffix);
        return Err(DocumentError::InvalidFileType(name));
    }
    Ok(name)
}

/// Reads a `.docx` file and builds the node tree of its main document part.
pub async fn load_docx(path: &Path) -> Result<LoadedDocument, DocumentError> {
    let file_name = validate_suffix(path, ".docx")?;

    tracing::info!("Loading document: {}", path.display());
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| DocumentError::load(&file_name, e))?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());

    let root = parse_docx_bytes(&file_name, &bytes)?;
    tracing::info!("Built node tree for {} ({} nodes)", file_name, root.subtree_len());

    Ok(LoadedDocument { file_name, size_bytes: bytes.len() as u64, root })
}

/// Reads a node tree that was dumped as JSON by another document parser.
pub async fn load_node_tree(path: &Path) -> Result<LoadedDocument, DocumentError> {
    let file_name = validate_suffix(path, ".json")?;

    tracing::info!("Loading node tree dump: {}", path.display());
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| DocumentError::load(&file_name, e))?;
    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| DocumentError::load(&file_name, e))?;

    Ok(LoadedDocument {
        file_name,
        size_bytes: bytes.len() as u64,
        root: Node::from_json(&value),
    })
}

/// Unzips the container and parses `word/document.xml` into a node tree.
pub fn parse_docx_bytes(file_name: &str, bytes: &[u8]) -> Result<Node, DocumentError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| DocumentError::load(file_name, e))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| DocumentError::load(file_name, format!("{}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| DocumentError::load(file_name, e))?;

    parse_document_xml(file_name, &xml)
}

/// Parses WordprocessingML into a node tree rooted at the document element.
pub fn parse_document_xml(file_name: &str, xml: &str) -> Result<Node, DocumentError> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| DocumentError::load(file_name, e))?;
    Ok(convert(doc.root_element()))
}

fn convert(xml_node: roxmltree::Node) -> Node {
    if xml_node.is_text() {
        return Node::text(xml_node.text().unwrap_or_default());
    }

    let children = xml_node
        .children()
        .filter(|c| c.is_element() || c.is_text())
        .map(convert)
        .collect();

    Node::Element { tag: qualified_tag(&xml_node), children: Children::List(children) }
}

// Word's namespace is normalized to the `w:` prefix whatever the file declares
fn qualified_tag(xml_node: &roxmltree::Node) -> String {
    let name = xml_node.tag_name();
    match name.namespace() {
        Some(W_NS) => format!("w:{}", name.name()),
        Some(ns) => match xml_node.lookup_prefix(ns) {
            Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, name.name()),
            _ => name.name().to_string(),
        },
        None => name.name().to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::docx::node::Role;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    pub(crate) const SALES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Quarterly report</w:t></w:r></w:p>
    <w:tbl>
      <w:tblPr><w:tblStyle w:val="TableGrid"/></w:tblPr>
      <w:tr>
        <w:tc><w:p><w:r><w:t>Month</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t xml:space="preserve"> Reve</w:t></w:r><w:r><w:t>nue </w:t></w:r></w:p></w:tc>
      </w:tr>
      <w:tr>
        <w:tc><w:p><w:r><w:t>Jan</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>100</w:t></w:r></w:p></w:tc>
      </w:tr>
      <w:tr>
        <w:tc><w:p><w:r><w:t>Feb</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>200</w:t></w:r></w:p></w:tc>
      </w:tr>
    </w:tbl>
  </w:body>
</w:document>"#;

    pub(crate) fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(b"<Types/>").unwrap();
        zip.start_file(DOCUMENT_PART, options).unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn builds_tree_with_normalized_tags() {
        let root = parse_document_xml("t.docx", SALES_XML).unwrap();
        assert_eq!(root.tag(), Some("w:document"));
        let body = &root.children().unwrap().iter().find(|n| n.tag().is_some()).unwrap();
        assert_eq!(body.tag(), Some("w:body"));
        assert!(body.children().unwrap().iter().any(|n| n.is(Role::Table)));
    }

    #[test]
    fn other_prefixes_map_to_the_word_namespace() {
        let xml = r#"<x:document xmlns:x="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><x:body/></x:document>"#;
        let root = parse_document_xml("t.docx", xml).unwrap();
        assert_eq!(root.tag(), Some("w:document"));
    }

    #[test]
    fn malformed_xml_is_a_load_error() {
        let err = parse_document_xml("t.docx", "<w:document>").unwrap_err();
        assert!(matches!(err, DocumentError::Load { .. }));
    }

    #[test]
    fn non_zip_bytes_are_a_load_error() {
        let err = parse_docx_bytes("t.docx", b"definitely not a zip").unwrap_err();
        assert!(matches!(err, DocumentError::Load { .. }));
    }

    #[test]
    fn missing_document_part_is_a_load_error() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/styles.xml", FileOptions::default()).unwrap();
        zip.write_all(b"<w:styles/>").unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let err = parse_docx_bytes("t.docx", &bytes).unwrap_err();
        assert!(err.to_string().contains(DOCUMENT_PART));
    }

    #[test]
    fn wrong_suffix_is_rejected_before_reading() {
        // The file does not exist; validation must fail first
        let err = tokio_test::block_on(load_docx(Path::new("/nonexistent/report.pdf"))).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidFileType(name) if name == "report.pdf"));
    }

    #[test]
    fn suffix_check_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("REPORT.DOCX");
        std::fs::write(&path, docx_bytes(SALES_XML)).unwrap();

        let doc = tokio_test::block_on(load_docx(&path)).unwrap();
        assert_eq!(doc.file_name, "REPORT.DOCX");
        assert_eq!(doc.stem(), "REPORT");
        assert!(doc.size_bytes > 0);
    }

    #[test]
    fn node_tree_dump_loads_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        std::fs::write(&path, r#"{"tag":"w:document","children":[{"tag":"w:body"}]}"#).unwrap();

        let doc = tokio_test::block_on(load_node_tree(&path)).unwrap();
        assert_eq!(doc.root.tag(), Some("w:document"));
        assert_eq!(doc.root.subtree_len(), 2);
    }
}
