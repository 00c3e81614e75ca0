// src/charts/mod.rs
pub mod options;
pub mod shaping;

pub use options::{ChartType, InfographicOptions};
pub use shaping::{create_chart_config, ChartConfig};
