// src/charts/options.rs
use crate::utils::error::ChartError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const MAX_COLORS: usize = 10;

/// Preset palettes offered to the user, six colors each.
pub const PALETTES: [[&str; 6]; 5] = [
    ["#2563EB", "#7C3AED", "#0D9488", "#16A34A", "#F59E0B", "#DC2626"],
    ["#0284C7", "#4F46E5", "#7E22CE", "#BE185D", "#EA580C", "#16A34A"],
    ["#475569", "#64748B", "#94A3B8", "#CBD5E1", "#E2E8F0", "#F1F5F9"],
    ["#881337", "#9F1239", "#BE123C", "#E11D48", "#F43F5E", "#FB7185"],
    ["#134E4A", "#115E59", "#0F766E", "#0D9488", "#14B8A6", "#2DD4BF"],
];

static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Failed to compile HEX_COLOR_RE")
});

/// Whether `color` is a `#RRGGBB` hex color.
pub fn is_hex_color(color: &str) -> bool {
    HEX_COLOR_RE.is_match(color)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Doughnut,
    Radar,
    PolarArea,
}

impl ChartType {
    /// Pie-like charts color each data point instead of each series and
    /// have no axes.
    pub fn is_pie_like(self) -> bool {
        matches!(self, ChartType::Pie | ChartType::Doughnut | ChartType::PolarArea)
    }

    pub fn has_axes(self) -> bool {
        matches!(self, ChartType::Bar | ChartType::Line)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Doughnut => "doughnut",
            ChartType::Radar => "radar",
            ChartType::PolarArea => "polarArea",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "bar" => Ok(ChartType::Bar),
            "line" => Ok(ChartType::Line),
            "pie" => Ok(ChartType::Pie),
            "doughnut" => Ok(ChartType::Doughnut),
            "radar" => Ok(ChartType::Radar),
            "polararea" => Ok(ChartType::PolarArea),
            _ => Err(ChartError::UnknownChartType(s.to_string())),
        }
    }
}

/// How a table is turned into an infographic.
#[derive(Debug, Clone, PartialEq)]
pub struct InfographicOptions {
    pub title: String,
    pub description: String,
    pub chart_type: ChartType,
    pub colors: Vec<String>,
    pub show_legend: bool,
}

impl Default for InfographicOptions {
    fn default() -> Self {
        Self {
            title: "My Infographic".to_string(),
            description: "Data visualization created from document".to_string(),
            chart_type: ChartType::Bar,
            colors: palette(0).unwrap_or_default(),
            show_legend: true,
        }
    }
}

impl InfographicOptions {
    pub fn with_palette(mut self, index: usize) -> Result<Self, ChartError> {
        self.colors = palette(index).ok_or(ChartError::UnknownPalette(index))?;
        Ok(self)
    }

    /// Replaces the colors with a custom list of `#RRGGBB` values.
    pub fn with_colors<I, S>(mut self, colors: I) -> Result<Self, ChartError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let colors: Vec<String> = colors
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .collect();

        if colors.is_empty() || colors.len() > MAX_COLORS {
            return Err(ChartError::ColorCount { got: colors.len(), max: MAX_COLORS });
        }
        if let Some(bad) = colors.iter().find(|c| !is_hex_color(c)) {
            return Err(ChartError::InvalidColor(bad.clone()));
        }

        self.colors = colors;
        Ok(self)
    }
}

pub fn palette(index: usize) -> Option<Vec<String>> {
    PALETTES
        .get(index)
        .map(|p| p.iter().map(|c| c.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_type_parses_loosely() {
        assert_eq!("BAR".parse::<ChartType>(), Ok(ChartType::Bar));
        assert_eq!("polarArea".parse::<ChartType>(), Ok(ChartType::PolarArea));
        assert_eq!("polar-area".parse::<ChartType>(), Ok(ChartType::PolarArea));
        assert_eq!(
            "scatter".parse::<ChartType>(),
            Err(ChartError::UnknownChartType("scatter".to_string()))
        );
    }

    #[test]
    fn chart_type_serializes_in_chartjs_form() {
        assert_eq!(serde_json::to_string(&ChartType::PolarArea).unwrap(), "\"polarArea\"");
        assert_eq!(ChartType::Doughnut.to_string(), "doughnut");
    }

    #[test]
    fn defaults_use_first_palette() {
        let options = InfographicOptions::default();
        assert_eq!(options.colors.len(), 6);
        assert_eq!(options.colors[0], "#2563EB");
        assert!(options.show_legend);
    }

    #[test]
    fn palette_selection_is_bounded() {
        let options = InfographicOptions::default().with_palette(4).unwrap();
        assert_eq!(options.colors[0], "#134E4A");
        assert_eq!(
            InfographicOptions::default().with_palette(5),
            Err(ChartError::UnknownPalette(5))
        );
    }

    #[test]
    fn custom_colors_are_validated() {
        let options = InfographicOptions::default().with_colors([" #ff0000", "#00FF00"]).unwrap();
        assert_eq!(options.colors, vec!["#ff0000", "#00FF00"]);

        assert_eq!(
            InfographicOptions::default().with_colors(["red"]),
            Err(ChartError::InvalidColor("red".to_string()))
        );
        assert_eq!(
            InfographicOptions::default().with_colors(Vec::<String>::new()),
            Err(ChartError::ColorCount { got: 0, max: MAX_COLORS })
        );
        assert_eq!(
            InfographicOptions::default().with_colors(vec!["#000000"; 11]),
            Err(ChartError::ColorCount { got: 11, max: MAX_COLORS })
        );
    }
}
