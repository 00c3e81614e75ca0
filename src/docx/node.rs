// src/docx/node.rs
use serde_json::Value;

/// Semantic role of an element, derived from its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Table,
    Row,
    Cell,
    Paragraph,
    Run,
    Text,
    Other,
}

impl Role {
    /// Maps a WordprocessingML tag (`w:tbl`, `w:tr`, ...) to its role.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "w:tbl" => Role::Table,
            "w:tr" => Role::Row,
            "w:tc" => Role::Cell,
            "w:p" => Role::Paragraph,
            "w:r" => Role::Run,
            "w:t" => Role::Text,
            _ => Role::Other,
        }
    }
}

/// The child sequence of an element, as it was found.
#[derive(Debug, Clone, PartialEq)]
pub enum Children {
    List(Vec<Node>),
    /// No child field at all.
    Absent,
    /// A child field that is not a sequence.
    Malformed,
}

/// A node of a parsed document tree.
///
/// Documents from the wild do not follow a fixed schema, so a node is
/// only ever inspected through the guards below, never by assuming a
/// field is present.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element { tag: String, children: Children },
    Text(String),
    /// Anything that could not be recognised as an element or text.
    Opaque,
}

impl Node {
    pub fn element(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Element { tag: tag.into(), children: Children::List(children) }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.tag().map(Role::from_tag)
    }

    pub fn is(&self, role: Role) -> bool {
        self.role() == Some(role)
    }

    /// Children of an element, or `None` when the node has no usable
    /// child sequence (text, opaque, absent or malformed children).
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Element { children: Children::List(list), .. } => Some(list),
            _ => None,
        }
    }

    /// Number of nodes in this subtree, self included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children()
            .map(|c| c.iter().map(Node::subtree_len).sum())
            .unwrap_or(0)
    }

    /// Builds a node from an arbitrary JSON value shaped like
    /// `{"tag": "w:tbl", "children": [...]}`.
    ///
    /// Strings become text nodes; objects without a string `tag` and any
    /// other value become `Opaque`. Never fails.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => Node::Text(s.clone()),
            Value::Object(map) => {
                let Some(tag) = map.get("tag").and_then(Value::as_str) else {
                    return Node::Opaque;
                };
                let children = match map.get("children") {
                    None | Some(Value::Null) => Children::Absent,
                    Some(Value::Array(items)) => {
                        Children::List(items.iter().map(Node::from_json).collect())
                    }
                    Some(_) => Children::Malformed,
                };
                Node::Element { tag: tag.to_string(), children }
            }
            _ => Node::Opaque,
        }
    }
}
