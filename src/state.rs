use std::path::Path;

use crate::config::AnalyzerConfig;
use crate::data::loader::{self, IngestError};
use crate::data::model::{ColumnPartition, Dataset};

// ---------------------------------------------------------------------------
// Chart selections
// ---------------------------------------------------------------------------

/// The column(s) each chart panel is currently showing. Panels never share
/// a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSelection {
    pub histogram: Option<String>,
    pub box_plot: Option<String>,
    pub scatter_x: Option<String>,
    pub scatter_y: Option<String>,
    /// `None` draws the scatter plot ungrouped.
    pub scatter_color: Option<String>,
    pub pie: Option<String>,
}

impl ChartSelection {
    /// Initial picks for a freshly loaded table.
    pub fn defaults_for(partition: &ColumnPartition) -> Self {
        let first_numeric = partition.numeric.first().cloned();
        Self {
            histogram: first_numeric.clone(),
            box_plot: first_numeric.clone(),
            scatter_x: first_numeric.clone(),
            scatter_y: partition.numeric.get(1).cloned().or(first_numeric),
            scatter_color: partition.categorical.first().cloned(),
            pie: partition.categorical.first().cloned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Dataset>,

    /// Display name of the file the dataset came from.
    pub source_name: Option<String>,

    /// Per-panel column choices.
    pub selection: ChartSelection,

    /// Ingestion error shown in the UI.
    pub status_message: Option<String>,

    pub config: AnalyzerConfig,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl AppState {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            dataset: None,
            source_name: None,
            selection: ChartSelection::default(),
            status_message: None,
            config,
        }
    }

    /// Install a newly loaded dataset and reset the panel selections.
    pub fn set_dataset(&mut self, dataset: Dataset, source_name: String) {
        let partition = dataset.partition();
        self.selection = ChartSelection::defaults_for(&partition);
        log::debug!("Selections reset for {source_name}: {:?}", self.selection);

        self.dataset = Some(dataset);
        self.source_name = Some(source_name);
        self.status_message = None;
    }

    /// Drop the current dataset and record why the upload failed.
    pub fn fail_load(&mut self, source_name: &str, err: &IngestError) {
        log::error!("Failed to load {source_name}: {err}");
        self.dataset = None;
        self.source_name = None;
        self.selection = ChartSelection::default();
        self.status_message = Some(format!("Error loading {source_name}: {err}"));
    }

    /// Apply the outcome of one upload attempt.
    pub fn apply_load(&mut self, source_name: String, result: Result<Dataset, IngestError>) {
        match result {
            Ok(dataset) => {
                log::info!(
                    "Loaded {source_name}: {} rows × {} columns {:?}",
                    dataset.n_rows(),
                    dataset.n_columns(),
                    dataset.column_names()
                );
                self.set_dataset(dataset, source_name);
            }
            Err(e) => self.fail_load(&source_name, &e),
        }
    }

    pub fn load_path(&mut self, path: &Path) {
        self.apply_load(display_name(path), loader::load_file(path));
    }

    /// Load a file dropped onto the window.
    pub fn load_dropped(&mut self, name: &str, bytes: Option<&[u8]>, path: Option<&Path>) {
        let name = match (name.is_empty(), path) {
            (false, _) => name.to_string(),
            (true, Some(p)) => display_name(p),
            (true, None) => "dropped file".to_string(),
        };
        self.apply_load(name, loader::load_dropped(bytes, path));
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv_bytes;

    const AGE_CITY: &[u8] = b"age,city\n30,Paris\n,Lyon\n25,Paris\n41,Nice\n35,Lyon\n";

    #[test]
    fn successful_load_sets_dataset_and_defaults() {
        let mut state = AppState::default();
        state.apply_load("people.csv".into(), parse_csv_bytes(AGE_CITY));

        assert!(state.dataset.is_some());
        assert_eq!(state.source_name.as_deref(), Some("people.csv"));
        assert_eq!(state.status_message, None);
        assert_eq!(state.selection.histogram.as_deref(), Some("age"));
        assert_eq!(state.selection.scatter_y.as_deref(), Some("age"));
        assert_eq!(state.selection.pie.as_deref(), Some("city"));
        assert_eq!(state.selection.scatter_color.as_deref(), Some("city"));
    }

    #[test]
    fn failed_load_clears_previous_dataset() {
        let mut state = AppState::default();
        state.apply_load("people.csv".into(), parse_csv_bytes(AGE_CITY));
        state.load_dropped("image.png", Some(&[0x89, b'P', b'N', b'G', 0, 0][..]), None);

        assert!(state.dataset.is_none());
        assert!(state.source_name.is_none());
        assert_eq!(state.selection, ChartSelection::default());
        let msg = state.status_message.unwrap();
        assert!(msg.contains("image.png"));
        assert!(msg.contains("binary"));
    }

    #[test]
    fn new_upload_replaces_dataset_and_selections() {
        let mut state = AppState::default();
        state.apply_load("people.csv".into(), parse_csv_bytes(AGE_CITY));
        state.selection.histogram = Some("stale".into());
        state.apply_load("m.csv".into(), parse_csv_bytes(b"x,y\n1,2\n3,4\n"));

        let ds = state.dataset.as_ref().unwrap();
        assert_eq!(ds.column_names(), vec!["x", "y"]);
        assert_eq!(state.selection.histogram.as_deref(), Some("x"));
        assert_eq!(state.selection.scatter_y.as_deref(), Some("y"));
        assert_eq!(state.selection.pie, None);
    }

    #[test]
    fn missing_path_is_reported() {
        let mut state = AppState::default();
        state.load_path(Path::new("/nonexistent/data.csv"));
        assert!(state.dataset.is_none());
        assert!(state.status_message.unwrap().contains("data.csv"));
    }

    #[test]
    fn unnamed_drop_without_content_is_reported() {
        let mut state = AppState::default();
        state.load_dropped("", None, None);
        assert!(state.status_message.unwrap().contains("dropped file"));
    }
}
