use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::charts::Dashboard;
use crate::color::ColorMap;
use crate::data::cache::DatasetCache;
use crate::data::model::{Column, TaxiDataset};
use crate::error::Result;
use crate::page::Page;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is opened).
    pub dataset: Option<Arc<TaxiDataset>>,

    /// Chart data derived from `dataset`.
    pub dashboard: Option<Dashboard>,

    /// Colours for the `color` category.
    pub color_map: Option<ColorMap>,

    /// Page selected in the sidebar.
    pub page: Page,

    /// Where `dataset` was read from.
    pub source: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    cache: DatasetCache,
}

impl AppState {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Ingest a loaded dataset and precompute every page.
    pub fn set_dataset(&mut self, source: Option<PathBuf>, dataset: Arc<TaxiDataset>) {
        self.dashboard = Some(Dashboard::build(&dataset));
        self.color_map = Some(ColorMap::new(Column::Color.name(), &dataset.colors));
        self.dataset = Some(dataset);
        self.source = source;
        self.status_message = None;
    }

    /// Load `path` (through the cache) and make it the current dataset.
    /// On failure the current dataset stays and the error is shown.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        match self.cache.load(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} trips from {} ({} color categories)",
                    dataset.len(),
                    path.display(),
                    dataset.colors.len()
                );
                self.set_dataset(Some(path.to_path_buf()), dataset);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Re-read the current source file, bypassing the cache.
    pub fn reload(&mut self) -> Result<()> {
        let Some(path) = self.source.clone() else {
            self.status_message = Some("Nothing to reload".to_string());
            return Ok(());
        };
        self.cache.invalidate(&path);
        self.open(&path)
    }

    pub fn select_page(&mut self, page: Page) {
        if self.page != page {
            log::debug!("Switching page: {} → {}", self.page, page);
            self.page = page;
        }
    }

    pub fn row_count(&self) -> usize {
        self.dataset.as_ref().map_or(0, |ds| ds.len())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn csv_file(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "passengers,distance,tip,total,color").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn open_builds_dashboard_and_colors() {
        let file = csv_file(&["1,1.0,1.0,10.0,yellow", "2,2.0,0.0,8.0,green"]);
        let mut state = AppState::new(Page::Distribution);
        state.open(file.path()).unwrap();
        assert_eq!(state.row_count(), 2);
        assert_eq!(state.page, Page::Distribution);
        assert!(state.dashboard.is_some());
        assert_eq!(state.color_map.as_ref().unwrap().legend_entries().len(), 2);
        assert_eq!(state.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn failed_open_keeps_previous_dataset() {
        let file = csv_file(&["1,1.0,1.0,10.0,yellow"]);
        let mut state = AppState::default();
        state.open(file.path()).unwrap();
        assert!(state.open(Path::new("/nonexistent/taxis.csv")).is_err());
        assert_eq!(state.row_count(), 1);
        assert!(state.status_message.as_deref().unwrap().starts_with("Error:"));
    }

    #[test]
    fn reload_picks_up_file_changes() {
        let mut file = csv_file(&["1,1.0,1.0,10.0,yellow"]);
        let mut state = AppState::default();
        state.open(file.path()).unwrap();
        writeln!(file, "3,2.0,2.0,20.0,green").unwrap();
        file.flush().unwrap();

        state.open(file.path()).unwrap();
        assert_eq!(state.row_count(), 1, "second open is served from the cache");
        state.reload().unwrap();
        assert_eq!(state.row_count(), 2);
    }

    #[test]
    fn reload_without_source_is_a_no_op() {
        let mut state = AppState::default();
        state.reload().unwrap();
        assert!(state.dataset.is_none());
        assert_eq!(state.status_message.as_deref(), Some("Nothing to reload"));
    }

    #[test]
    fn select_page_switches() {
        let mut state = AppState::default();
        state.select_page(Page::InteractiveCharts);
        assert_eq!(state.page, Page::InteractiveCharts);
    }
}
