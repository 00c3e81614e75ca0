// src/charts/shaping.rs
use crate::charts::options::{ChartType, InfographicOptions};
use crate::extractors::table::ExtractedTable;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// Leading decimal number, the way a browser's parseFloat reads it
static LEADING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("Failed to compile LEADING_NUMBER_RE")
});

/// Numeric value of a cell: the number it starts with, or 0.
///
/// `"12.5%"` reads as 12.5 and `"1,200"` as 1; text, blanks and
/// missing cells read as 0.
pub fn cell_value(cell: Option<&str>) -> f64 {
    cell.map(str::trim_start)
        .and_then(|s| LEADING_NUMBER_RE.find(s))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// A Chart.js chart definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: Paint,
    pub border_color: Paint,
    pub border_width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
}

/// One color for a whole series, or one per data point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    Single(String),
    PerPoint(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub plugins: Plugins,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
    pub animation: Animation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub legend: Legend,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub display: bool,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub enabled: bool,
    pub mode: String,
    pub intersect: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
    pub grid: Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Animation {
    pub duration: u32,
    pub easing: String,
}

/// Shapes a table into a chart: column 0 labels the categories, every
/// further column becomes one numeric series.
pub fn create_chart_config(table: &ExtractedTable, options: &InfographicOptions) -> ChartConfig {
    let chart_type = options.chart_type;
    let colors = &options.colors;
    let series_color = |i: usize| colors.get(i % colors.len().max(1)).cloned().unwrap_or_default();

    let labels = table
        .rows
        .iter()
        .map(|row| row.first().cloned().unwrap_or_default())
        .collect();

    let datasets = table
        .headers
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, header)| {
            let data: Vec<f64> = table
                .rows
                .iter()
                .map(|row| cell_value(row.get(i).map(String::as_str)))
                .collect();

            let color = series_color(i - 1);
            let (background_color, border_color) = if chart_type.is_pie_like() {
                let per_point = (0..data.len()).map(series_color).collect();
                (Paint::PerPoint(per_point), Paint::Single("white".to_string()))
            } else if chart_type == ChartType::Radar {
                (Paint::Single(format!("{}33", color)), Paint::Single(color))
            } else {
                (Paint::Single(color.clone()), Paint::Single(color))
            };

            let (tension, fill) = match chart_type {
                ChartType::Line => (Some(0.3), Some(false)),
                ChartType::Radar => (None, Some(true)),
                _ => (None, None),
            };

            Dataset {
                label: header.clone(),
                data,
                background_color,
                border_color,
                border_width: 1,
                tension,
                fill,
            }
        })
        .collect();

    tracing::debug!("Shaped {} into a {} chart", table.id, chart_type);

    ChartConfig {
        chart_type,
        data: ChartData { labels, datasets },
        options: chart_options(chart_type, options.show_legend),
    }
}

fn chart_options(chart_type: ChartType, show_legend: bool) -> ChartOptions {
    let scales = chart_type.has_axes().then(|| Scales {
        x: Axis { begin_at_zero: None, grid: Grid { display: Some(false), color: None } },
        y: Axis {
            begin_at_zero: Some(true),
            grid: Grid { display: None, color: Some("rgba(0, 0, 0, 0.05)".to_string()) },
        },
    });

    ChartOptions {
        responsive: true,
        maintain_aspect_ratio: false,
        plugins: Plugins {
            legend: Legend { display: show_legend, position: "top".to_string() },
            tooltip: Tooltip { enabled: true, mode: "index".to_string(), intersect: false },
        },
        scales,
        animation: Animation { duration: 1000, easing: "easeOutQuart".to_string() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sales() -> ExtractedTable {
        ExtractedTable {
            id: "table-0".to_string(),
            title: "Table 1".to_string(),
            headers: vec!["Month".into(), "Revenue".into(), "Margin".into()],
            rows: vec![
                vec!["Jan".into(), "100".into(), "12.5%".into()],
                vec!["Feb".into(), "n/a".into()],
                vec![],
            ],
        }
    }

    fn with_type(chart_type: ChartType) -> InfographicOptions {
        InfographicOptions { chart_type, ..InfographicOptions::default() }
    }

    #[test]
    fn cell_values_read_like_parse_float() {
        assert_eq!(cell_value(Some("100")), 100.0);
        assert_eq!(cell_value(Some("  -3.5e2 units")), -350.0);
        assert_eq!(cell_value(Some(".5")), 0.5);
        assert_eq!(cell_value(Some("1,200")), 1.0);
        assert_eq!(cell_value(Some("$100")), 0.0);
        assert_eq!(cell_value(Some("")), 0.0);
        assert_eq!(cell_value(None), 0.0);
    }

    #[test]
    fn first_column_labels_remaining_columns_series() {
        let chart = create_chart_config(&sales(), &InfographicOptions::default());
        assert_eq!(chart.data.labels, vec!["Jan", "Feb", ""]);
        assert_eq!(chart.data.datasets.len(), 2);
        assert_eq!(chart.data.datasets[0].label, "Revenue");
        assert_eq!(chart.data.datasets[0].data, vec![100.0, 0.0, 0.0]);
        assert_eq!(chart.data.datasets[1].data, vec![12.5, 0.0, 0.0]);
    }

    #[test]
    fn bar_series_cycle_through_colors() {
        let options = InfographicOptions::default().with_colors(["#111111"]).unwrap();
        let chart = create_chart_config(&sales(), &options);
        for dataset in &chart.data.datasets {
            assert_eq!(dataset.background_color, Paint::Single("#111111".to_string()));
            assert_eq!(dataset.border_width, 1);
        }
        assert!(chart.options.scales.is_some());
    }

    #[test]
    fn pie_charts_color_each_point() {
        let options = InfographicOptions::default().with_colors(["#111111", "#222222"]).unwrap();
        let options = InfographicOptions { chart_type: ChartType::Doughnut, ..options };
        let chart = create_chart_config(&sales(), &options);
        let dataset = &chart.data.datasets[0];
        assert_eq!(
            dataset.background_color,
            Paint::PerPoint(vec!["#111111".into(), "#222222".into(), "#111111".into()])
        );
        assert_eq!(dataset.border_color, Paint::Single("white".to_string()));
        assert!(chart.options.scales.is_none());
    }

    #[test]
    fn line_and_radar_styling() {
        let line = create_chart_config(&sales(), &with_type(ChartType::Line));
        assert_eq!(line.data.datasets[0].tension, Some(0.3));
        assert_eq!(line.data.datasets[0].fill, Some(false));

        let radar = create_chart_config(&sales(), &with_type(ChartType::Radar));
        let second = &radar.data.datasets[1];
        assert_eq!(second.fill, Some(true));
        assert_eq!(second.background_color, Paint::Single("#7C3AED33".to_string()));
        assert_eq!(second.border_color, Paint::Single("#7C3AED".to_string()));
        assert!(radar.options.scales.is_none());
    }

    #[test]
    fn serializes_as_chartjs_json() {
        let options = InfographicOptions { show_legend: false, ..InfographicOptions::default() };
        let table = ExtractedTable {
            id: "table-0".into(),
            title: "Table 1".into(),
            headers: vec!["Month".into(), "Revenue".into()],
            rows: vec![vec!["Jan".into(), "100".into()]],
        };
        let value = serde_json::to_value(create_chart_config(&table, &options)).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "bar",
                "data": {
                    "labels": ["Jan"],
                    "datasets": [{
                        "label": "Revenue",
                        "data": [100.0],
                        "backgroundColor": "#2563EB",
                        "borderColor": "#2563EB",
                        "borderWidth": 1
                    }]
                },
                "options": {
                    "responsive": true,
                    "maintainAspectRatio": false,
                    "plugins": {
                        "legend": {"display": false, "position": "top"},
                        "tooltip": {"enabled": true, "mode": "index", "intersect": false}
                    },
                    "scales": {
                        "x": {"grid": {"display": false}},
                        "y": {"beginAtZero": true, "grid": {"color": "rgba(0, 0, 0, 0.05)"}}
                    },
                    "animation": {"duration": 1000, "easing": "easeOutQuart"}
                }
            })
        );
    }

    #[test]
    fn single_column_table_has_no_series() {
        let table = ExtractedTable {
            id: "table-0".into(),
            title: "Table 1".into(),
            headers: vec!["Name".into()],
            rows: vec![vec!["Ada".into()]],
        };
        let chart = create_chart_config(&table, &InfographicOptions::default());
        assert_eq!(chart.data.labels, vec!["Ada"]);
        assert!(chart.data.datasets.is_empty());
    }
}
