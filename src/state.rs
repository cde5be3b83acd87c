use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::Color32;

use trade_dash::config::DashboardConfig;
use trade_dash::data::dashboard::{refresh, DashboardOutcome};
use trade_dash::data::filter::{FilterColumn, FilterSelection};
use trade_dash::data::loader::load_file;
use trade_dash::data::model::{Column, Dataset};
use trade_dash::data::sample::sample_rows;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Sampled working dataset (None until a file is loaded).
    pub sample: Option<Dataset>,

    /// Row count of the file the sample was drawn from.
    pub source_rows: usize,

    /// Per-column filter selections.
    pub selection: FilterSelection,

    /// Indices of sample rows passing the current filters.
    pub visible_indices: Vec<usize>,

    /// Aggregates for the current selection.
    pub outcome: DashboardOutcome,

    /// Colour per label for the categorical columns.
    pub colors: BTreeMap<Column, ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            sample: None,
            source_rows: 0,
            selection: FilterSelection::default(),
            visible_indices: Vec::new(),
            outcome: DashboardOutcome::NoData,
            colors: BTreeMap::new(),
            status_message: None,
        }
    }

    /// Load a file, sample it and make it the working dataset.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let dataset =
            load_file(path).with_context(|| format!("loading {}", path.display()))?;
        self.set_dataset(dataset);
        Ok(())
    }

    /// Ingest a newly loaded dataset: sample it, select everything, aggregate.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let sample = sample_rows(&dataset, self.config.sample_size, self.config.seed);
        log::info!(
            "Working on {} of {} transactions (seed {})",
            sample.len(),
            dataset.len(),
            self.config.seed
        );

        self.source_rows = dataset.len();
        self.selection = FilterSelection::all(&sample);
        self.colors = [Column::Category, Column::ImportExport]
            .into_iter()
            .map(|c| (c, ColorMap::new(sample.distinct_values(c))))
            .collect();
        self.sample = Some(sample);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the visible rows and every aggregate after a filter change.
    pub fn refilter(&mut self) {
        if let Some(sample) = &self.sample {
            let (visible, outcome) = refresh(sample, &self.selection, self.config.top_n);
            self.visible_indices = visible;
            self.outcome = outcome;
        }
    }

    /// Colour of `label` in `column`.
    pub fn color(&self, column: Column, label: &str) -> Color32 {
        self.colors
            .get(&column)
            .map(|m| m.color_for(label))
            .unwrap_or(Color32::GRAY)
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: FilterColumn, value: &str) {
        self.selection.toggle(column, value);
        self.refilter();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: FilterColumn) {
        if let Some(sample) = &self.sample {
            self.selection.select_all(column, sample);
            self.refilter();
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: FilterColumn) {
        self.selection.select_none(column);
        self.refilter();
    }

    /// Write the current aggregates as pretty JSON.
    pub fn export_views(&self, path: &Path) -> Result<()> {
        let views = self
            .outcome
            .views()
            .context("no data for the selected filters")?;
        let json = serde_json::to_string_pretty(views).context("serializing aggregates")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported aggregates to {}", path.display());
        Ok(())
    }
}
