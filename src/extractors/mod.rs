// src/extractors/mod.rs
pub mod table;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use table::{
    Anomaly,
    AnomalyKind,
    ExtractedTable,
    Extraction,
    TableExtractor,
};
