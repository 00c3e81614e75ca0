// src/main.rs
mod charts;
mod docx;
mod extractors;
mod session;
mod storage;
mod utils;

use std::path::PathBuf;
use clap::Parser;
use charts::options::is_hex_color;
use charts::{ChartType, InfographicOptions};
use docx::LoadedDocument;
use extractors::table::{Anomaly, TableExtractor};
use session::{ChartScope, Session};
use storage::{ExportOptions, StorageManager};
use utils::error::ChartError;
use utils::AppError;

/// Extracts the tables of a Word document and turns them into chart infographics
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the .docx document (a .json node-tree dump with --node-tree)
    input: PathBuf,

    /// Treat the input as a JSON node-tree dump instead of a .docx file
    #[arg(long)]
    node_tree: bool,

    /// Output directory for tables, metadata and the chart bundle
    #[arg(short, long, env = "INFOGRAPHICS_OUTPUT_DIR", default_value = "./output")]
    output_dir: String,

    /// Id of the table to chart (defaults to the first table)
    #[arg(short, long)]
    table: Option<String>,

    /// Chart every extracted table instead of only the selected one
    #[arg(long, conflicts_with = "table")]
    all: bool,

    /// Chart type: bar, line, pie, doughnut, radar or polarArea
    #[arg(short, long, default_value = "bar")]
    chart_type: String,

    /// Preset palette (0-4)
    #[arg(long, default_value_t = 0)]
    palette: usize,

    /// Custom colors, comma separated #RRGGBB values (overrides --palette)
    #[arg(long, value_delimiter = ',')]
    colors: Vec<String>,

    /// Infographic title
    #[arg(long)]
    title: Option<String>,

    /// Infographic description
    #[arg(long)]
    description: Option<String>,

    /// Hide the chart legend
    #[arg(long)]
    no_legend: bool,

    /// Export width in CSS pixels
    #[arg(long, default_value_t = 1900)]
    width: u32,

    /// Export height in CSS pixels
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Device pixel ratio used when rasterizing
    #[arg(long, default_value_t = 2)]
    pixel_ratio: u32,

    /// Background color of exported images
    #[arg(long, default_value = "#ffffff")]
    background: String,

    /// Debug mode - save an outline of the document's node tree
    #[arg(short, long)]
    debug: bool,
}

fn infographic_options(args: &Args) -> Result<InfographicOptions, AppError> {
    let chart_type: ChartType = args.chart_type.parse()?;
    let mut options = InfographicOptions::default().with_palette(args.palette)?;
    if !args.colors.is_empty() {
        options = options.with_colors(&args.colors)?;
    }
    if let Some(title) = &args.title {
        options.title = title.clone();
    }
    if let Some(description) = &args.description {
        options.description = description.clone();
    }
    options.chart_type = chart_type;
    options.show_legend = !args.no_legend;
    Ok(options)
}

fn export_options(args: &Args) -> Result<ExportOptions, AppError> {
    if args.width == 0 || args.height == 0 || args.pixel_ratio == 0 {
        return Err(AppError::Config(format!(
            "Export size must be positive, got {}x{} at {}x",
            args.width, args.height, args.pixel_ratio
        )));
    }
    // The rasterized size must still fit in a u32
    if args.width.checked_mul(args.pixel_ratio).is_none()
        || args.height.checked_mul(args.pixel_ratio).is_none()
    {
        return Err(AppError::Config(format!(
            "Export size {}x{} at {}x is too large",
            args.width, args.height, args.pixel_ratio
        )));
    }
    if !is_hex_color(&args.background) {
        return Err(ChartError::InvalidColor(args.background.clone()).into());
    }
    Ok(ExportOptions {
        width: args.width,
        height: args.height,
        device_pixel_ratio: args.pixel_ratio,
        background_color: args.background.clone(),
    })
}

/// Writes `debug/node_tree.txt` for the document. Failing to write it never
/// changes the outcome of a run.
fn save_debug_outline(storage: &StorageManager, document: &LoadedDocument, anomalies: &[Anomaly]) {
    let result = storage
        .document_dir(document.stem())
        .map_err(AppError::from)
        .map(|dir| dir.join("debug"))
        .and_then(|debug_dir| {
            std::fs::create_dir_all(&debug_dir)?;
            utils::tree_debug::save_node_outline(&document.root, anomalies, &debug_dir.join("node_tree.txt"))
        });
    if let Err(e) = result {
        tracing::warn!("Failed to save node tree outline: {}", e);
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    // 1. Validate options before touching the document
    let options = infographic_options(&args)?;
    let export = export_options(&args)?;
    tracing::debug!("Infographic options: {:?}", options);

    // 2. Initialize storage
    let storage = StorageManager::new(&args.output_dir)?;

    // 3. Load the document and build its node tree
    let document = if args.node_tree {
        docx::load_node_tree(&args.input).await?
    } else {
        docx::load_docx(&args.input).await?
    };

    // 4. Extract tables
    let extractor = TableExtractor::new();
    let extraction = match extractor.extract_with_report(&document.root) {
        Ok(extraction) => extraction,
        Err(e) => {
            if args.debug {
                save_debug_outline(&storage, &document, &[]);
            }
            return Err(e.into());
        }
    };

    if args.debug {
        save_debug_outline(&storage, &document, &extraction.anomalies);
    }

    // 5. Hold the tables for this document and pick what to chart
    let mut session = Session::new(options);
    session.load(extraction.tables.clone());
    if let Some(id) = &args.table {
        session.select(id)?;
    }
    let scope = if args.all { ChartScope::All } else { ChartScope::Selected };
    let charts = session.charts(scope);

    // 6. Save results
    storage.save_tables(document.stem(), session.tables())?;
    storage.save_metadata(&document, &extraction, session.options())?;
    let bundle = storage.export_charts(document.stem(), &charts, session.options(), &export)?;

    println!("Extracted {} tables from {}", session.tables().len(), document.file_name);
    for table in session.tables() {
        println!("  {}  {}  ({} columns, {} data rows)", table.id, table.title, table.headers.len(), table.rows.len());
    }
    if !extraction.anomalies.is_empty() {
        println!("  {} malformed nodes were skipped; run with --debug to inspect them", extraction.anomalies.len());
    }
    println!("Charts written to {}", bundle.display());

    Ok(())
}

#[tokio::main]
async fn main() {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    if let Err(e) = run(args).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
