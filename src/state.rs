use std::path::Path;
use std::sync::Arc;

use crate::config::{reference_columns, sensor_columns, AllowedColumns, ChartConfigs};
use crate::data::model::{Dataset, MissingReport};
use crate::data::store::DataStore;

/// Fixed sensor → reference calibration pairs shown on the calibration tab.
pub const CALIBRATION_PAIRS: &[(&str, &str)] = &[
    ("PT08.S1(CO)", "CO(GT)"),
    ("PT08.S3(NOx)", "NOx(GT)"),
    ("PT08.S4(NO2)", "NO2(GT)"),
];

/// The multivariate model: CO(GT) against its sensor plus ambient columns.
pub const MULTI_TARGET: &str = "CO(GT)";
pub const MULTI_PREDICTORS: &[&str] = &["PT08.S1(CO)", "T", "RH", "AH"];

/// The drift tab tracks the CO channel.
pub const DRIFT_PAIR: (&str, &str) = ("PT08.S1(CO)", "CO(GT)");

/// Column shown on the report tab.
pub const REPORT_COLUMN: &str = "CO(GT)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Distributions,
    Correlation,
    RawVsClean,
    Calibration,
    Drift,
    Report,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Distributions,
        Tab::Correlation,
        Tab::RawVsClean,
        Tab::Calibration,
        Tab::Drift,
        Tab::Report,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Distributions => "Distributions & Outliers",
            Tab::Correlation => "Correlation",
            Tab::RawVsClean => "Raw vs Clean",
            Tab::Calibration => "Calibration",
            Tab::Drift => "Drift",
            Tab::Report => "Report",
        }
    }
}

/// Per-tab column selections, initialised from the loaded dataset.
#[derive(Debug, Clone, Default)]
pub struct Selections {
    pub histogram_column: Option<String>,
    pub boxplot_columns: Vec<String>,
    pub scatter_x: Option<String>,
    pub scatter_y: Option<String>,
    /// `None` means "no colouring".
    pub scatter_color: Option<String>,
    pub heatmap_columns: Vec<String>,
    pub imputation_column: Option<String>,
    /// `None` means "all bands".
    pub report_band: Option<String>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. Owns the data caches and
/// the per-session chart configurations.
pub struct AppState {
    pub store: DataStore,
    pub allowed: AllowedColumns,
    pub configs: ChartConfigs,
    pub tab: Tab,

    /// Allow-list-filtered views of the cached datasets.
    pub clean: Option<Arc<Dataset>>,
    pub raw: Option<Arc<Dataset>>,
    pub missing: Option<Arc<MissingReport>>,

    pub selections: Selections,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    loaded: bool,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            store: DataStore::default(),
            allowed: AllowedColumns::default(),
            configs: ChartConfigs::default(),
            tab: Tab::Distributions,
            clean: None,
            raw: None,
            missing: None,
            selections: Selections::default(),
            status_message: None,
            loaded: false,
        }
    }
}

impl AppState {
    /// Load the three inputs (once; cached by the store) and derive the
    /// filtered views and default selections.
    pub fn ensure_loaded(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        self.status_message = None;

        match self.store.clean() {
            Ok(Some(ds)) => {
                self.clean = Some(Arc::new(self.allowed.clean_view(&ds)));
            }
            Ok(None) => {
                self.clean = None;
                self.status_message = Some(
                    "Clean dataset not found. Run the cleaning pipeline first.".to_string(),
                );
            }
            Err(e) => {
                log::error!("Failed to load clean dataset: {e}");
                self.clean = None;
                self.status_message = Some(format!("Error loading clean dataset: {e}"));
            }
        }

        match self.store.raw() {
            Ok(raw) => self.raw = raw.map(|ds| Arc::new(self.allowed.raw_view(&ds))),
            Err(e) => {
                log::error!("Failed to load raw dataset: {e}");
                self.raw = None;
            }
        }

        match self.store.missing_report() {
            Ok(report) => self.missing = report,
            Err(e) => {
                log::error!("Failed to load missing report: {e}");
                self.missing = None;
            }
        }

        self.init_selections();
    }

    /// Invalidate all caches and reload from the current file-system state.
    pub fn reload(&mut self) {
        self.store.invalidate();
        self.clean = None;
        self.raw = None;
        self.missing = None;
        self.loaded = false;
        self.ensure_loaded();
    }

    /// Point the store at a new data directory and reload.
    pub fn set_data_dir(&mut self, dir: &Path) {
        self.store.set_data_dir(dir);
        self.clean = None;
        self.raw = None;
        self.missing = None;
        self.loaded = false;
        self.ensure_loaded();
    }

    /// Default selections mirroring the dashboard's startup view.
    fn init_selections(&mut self) {
        let Some(clean) = &self.clean else {
            self.selections = Selections::default();
            return;
        };
        let names = clean.column_names();

        let boxplot_defaults = ["CO(GT)", "PT08.S1(CO)", "NOx(GT)"];
        let references = reference_columns(&names);
        let sensors = sensor_columns(&names);

        self.selections = Selections {
            histogram_column: names.first().map(|s| s.to_string()),
            boxplot_columns: boxplot_defaults
                .iter()
                .filter(|c| names.contains(&&***c))
                .map(|c| c.to_string())
                .collect(),
            scatter_x: references.first().map(|s| s.to_string()),
            scatter_y: sensors.first().map(|s| s.to_string()),
            scatter_color: None,
            heatmap_columns: names.iter().map(|s| s.to_string()).collect(),
            imputation_column: names.first().map(|s| s.to_string()),
            report_band: None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::store::DataPaths;
    use std::io::Write;

    fn write_file(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut f = std::fs::File::create(path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    fn state_with_data(dir: &Path) -> AppState {
        AppState {
            store: DataStore::new(DataPaths::from_data_dir(dir)),
            ..Default::default()
        }
    }

    #[test]
    fn missing_clean_dataset_sets_status_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_data(dir.path());
        state.ensure_loaded();
        assert!(state.clean.is_none());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn loaded_views_are_allow_list_filtered_with_default_selections() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_data(dir.path());
        write_file(
            &state.store.paths().clean.clone(),
            "DateTime,CO(GT),PT08.S1(CO),Rogue\n\
             2004-03-10 18:00:00,2.6,1360,7\n\
             2004-03-10 19:00:00,2.0,1292,8\n",
        );

        state.ensure_loaded();
        let clean = state.clean.as_ref().unwrap();
        assert_eq!(clean.column_names(), vec!["CO(GT)", "PT08.S1(CO)"]);
        assert_eq!(state.selections.histogram_column.as_deref(), Some("CO(GT)"));
        assert_eq!(
            state.selections.boxplot_columns,
            vec!["CO(GT)", "PT08.S1(CO)"]
        );
        assert_eq!(state.selections.scatter_x.as_deref(), Some("CO(GT)"));
        assert_eq!(state.selections.scatter_y.as_deref(), Some("PT08.S1(CO)"));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn reload_picks_up_new_file_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_data(dir.path());
        let clean_path = state.store.paths().clean.clone();

        write_file(
            &clean_path,
            "DateTime,CO(GT)\n2004-03-10 18:00:00,2.6\n",
        );
        state.ensure_loaded();
        assert_eq!(state.clean.as_ref().unwrap().len(), 1);

        write_file(
            &clean_path,
            "DateTime,CO(GT)\n2004-03-10 18:00:00,2.6\n2004-03-10 19:00:00,2.0\n",
        );
        // Without reload the cached view is served.
        state.ensure_loaded();
        assert_eq!(state.clean.as_ref().unwrap().len(), 1);

        state.reload();
        assert_eq!(state.clean.as_ref().unwrap().len(), 2);
    }
}
