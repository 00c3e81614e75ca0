// src/session.rs
use crate::charts::{create_chart_config, ChartConfig, InfographicOptions};
use crate::extractors::table::ExtractedTable;
use crate::utils::AppError;

/// Which tables to turn into charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartScope {
    Selected,
    All,
}

/// The tables of the current document, the selected one, and the
/// options used to chart them. Loading a new document replaces the
/// tables and resets the selection.
#[derive(Debug, Clone)]
pub struct Session {
    tables: Vec<ExtractedTable>,
    selected_id: Option<String>,
    options: InfographicOptions,
}

impl Session {
    pub fn new(options: InfographicOptions) -> Self {
        Self { tables: Vec::new(), selected_id: None, options }
    }

    pub fn load(&mut self, tables: Vec<ExtractedTable>) {
        if !self.tables.is_empty() {
            tracing::debug!("Discarding {} tables from the previous document", self.tables.len());
        }
        self.selected_id = tables.first().map(|t| t.id.clone());
        self.tables = tables;
    }

    pub fn tables(&self) -> &[ExtractedTable] {
        &self.tables
    }

    pub fn options(&self) -> &InfographicOptions {
        &self.options
    }

    pub fn selected(&self) -> Option<&ExtractedTable> {
        let id = self.selected_id.as_deref()?;
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn select(&mut self, id: &str) -> Result<&ExtractedTable, AppError> {
        let Some(index) = self.tables.iter().position(|t| t.id == id) else {
            let available: Vec<&str> = self.tables.iter().map(|t| t.id.as_str()).collect();
            return Err(AppError::Config(format!(
                "Unknown table '{}'. Available tables: {}",
                id,
                available.join(", ")
            )));
        };
        self.selected_id = Some(id.to_string());
        tracing::info!("Selected {}", id);
        Ok(&self.tables[index])
    }

    /// Chart definitions for the tables in `scope`, paired with the table
    /// each came from.
    pub fn charts(&self, scope: ChartScope) -> Vec<(&ExtractedTable, ChartConfig)> {
        let tables: Vec<&ExtractedTable> = match scope {
            ChartScope::All => self.tables.iter().collect(),
            ChartScope::Selected => self.selected().into_iter().collect(),
        };
        tables
            .into_iter()
            .map(|table| (table, create_chart_config(table, &self.options)))
            .collect()
    }
}
