// src/storage/mod.rs
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use zip::write::FileOptions;
use zip::ZipWriter;
use crate::charts::{ChartConfig, InfographicOptions};
use crate::docx::LoadedDocument;
use crate::extractors::table::{ExtractedTable, Extraction};
use crate::utils::error::StorageError;

pub const BUNDLE_NAME: &str = "infographics.zip";

static NON_SLUG_CHAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-z0-9]").expect("Failed to compile NON_SLUG_CHAR_RE")
});

/// Target raster size of exported charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: u32,
    pub background_color: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: 1900,
            height: 1080,
            device_pixel_ratio: 2,
            background_color: "#ffffff".to_string(),
        }
    }
}

/// One bundle entry: a chart and everything a renderer needs to
/// rasterize it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderJob<'a> {
    title: &'a str,
    heading: &'a str,
    description: &'a str,
    width: u32,
    height: u32,
    device_pixel_ratio: u32,
    pixel_width: u64,
    pixel_height: u64,
    background_color: &'a str,
    chart: &'a ChartConfig,
}

/// Bundle entry name for a chart title: lowercased, with every
/// character outside `[a-z0-9]` turned into `-`.
pub fn chart_file_name(title: &str) -> String {
    format!("{}.json", NON_SLUG_CHAR_RE.replace_all(&title.to_lowercase(), "-"))
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Directory holding everything produced for one document, e.g.
    /// `<base_dir>/quarterly_report/`. Files from an earlier run on the
    /// same document are overwritten.
    pub fn document_dir(&self, stem: &str) -> Result<PathBuf, StorageError> {
        let dir = self.base_dir.join(stem);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }

    /// Saves the extracted tables as pretty-printed JSON
    pub fn save_tables(&self, stem: &str, tables: &[ExtractedTable]) -> Result<PathBuf, StorageError> {
        let file_path = self.document_dir(stem)?.join("tables.json");

        let json = serde_json::to_string_pretty(tables)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, json)?;

        tracing::info!("Saved {} tables to {}", tables.len(), file_path.display());
        Ok(file_path)
    }

    /// Saves metadata about the document and its extraction in JSON format
    pub fn save_metadata(
        &self,
        document: &LoadedDocument,
        extraction: &Extraction,
        options: &InfographicOptions,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.document_dir(document.stem())?.join("metadata.json");

        let tables: Vec<serde_json::Value> = extraction
            .tables
            .iter()
            .map(|t| serde_json::json!({
                "id": t.id,
                "title": t.title,
                "column_count": t.headers.len(),
                "row_count": t.rows.len(),
            }))
            .collect();

        let metadata = serde_json::json!({
            "file_name": document.file_name,
            "file_size": document.size_bytes,
            "table_count": extraction.tables.len(),
            "tables": tables,
            "skipped_node_count": extraction.anomalies.len(),
            "infographic_title": options.title,
            "infographic_description": options.description,
            "chart_type": options.chart_type.as_str(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, metadata_str)?;

        tracing::info!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }

    /// Packages one render job per chart into `infographics.zip`.
    pub fn export_charts(
        &self,
        stem: &str,
        charts: &[(&ExtractedTable, ChartConfig)],
        options: &InfographicOptions,
        export: &ExportOptions,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.document_dir(stem)?.join(BUNDLE_NAME);
        let file = fs::File::create(&file_path)?;

        let mut zip = ZipWriter::new(file);
        let entry_options = FileOptions::default();
        let mut used_names = HashSet::new();

        for (table, chart) in charts {
            let name = unique_name(chart_file_name(&table.title), &mut used_names);
            let job = RenderJob {
                title: &table.title,
                heading: &options.title,
                description: &options.description,
                width: export.width,
                height: export.height,
                device_pixel_ratio: export.device_pixel_ratio,
                pixel_width: u64::from(export.width) * u64::from(export.device_pixel_ratio),
                pixel_height: u64::from(export.height) * u64::from(export.device_pixel_ratio),
                background_color: &export.background_color,
                chart,
            };
            let body = serde_json::to_vec_pretty(&job)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?;

            zip.start_file(name.as_str(), entry_options)?;
            zip.write_all(&body)?;
            tracing::debug!("Added {} to {}", name, BUNDLE_NAME);
        }

        zip.finish()?;

        tracing::info!("Exported {} charts to {}", charts.len(), file_path.display());
        Ok(file_path)
    }
}

// Later duplicates get a numeric suffix: table.json, table-2.json, ...
fn unique_name(name: String, used: &mut HashSet<String>) -> String {
    if used.insert(name.clone()) {
        return name;
    }
    let stem = name.trim_end_matches(".json");
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}.json", stem, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
