// src/docx/mod.rs
pub mod loader;
pub mod node;

// Re-export the types the rest of the crate works with
#[allow(unused_imports)]
pub use loader::{load_docx, load_node_tree, LoadedDocument};
pub use node::{Node, Role};
