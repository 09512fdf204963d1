use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::Result;
use super::loader;
use super::model::{Dataset, MissingReport};

/// File names produced by the upstream cleaning pipeline.
pub const CLEAN_FILE: &str = "air_quality_UCI_cleaned.csv";
pub const RAW_FILE: &str = "AirQualityUCI_cleaned_columns_and_rows_any.csv";
pub const MISSING_FILE: &str = "missing_values_summary.csv";

// ---------------------------------------------------------------------------
// DataPaths – where the three inputs live
// ---------------------------------------------------------------------------

/// Paths to the three input files, derived from a data directory with the
/// pipeline's layout: cleaned data and report under `processed/`, the raw
/// dump under `raw/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub clean: PathBuf,
    pub raw: PathBuf,
    pub missing: PathBuf,
}

impl DataPaths {
    pub fn from_data_dir(dir: &Path) -> Self {
        DataPaths {
            clean: dir.join("processed").join(CLEAN_FILE),
            raw: dir.join("raw").join(RAW_FILE),
            missing: dir.join("processed").join(MISSING_FILE),
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths::from_data_dir(Path::new("Data"))
    }
}

// ---------------------------------------------------------------------------
// DataStore – single-slot caches with explicit invalidation
// ---------------------------------------------------------------------------

/// One cached load result, keyed by the path it came from. A `None` value
/// means "file absent", which is cached too so a missing file is not probed
/// on every frame.
#[derive(Debug)]
struct Slot<T> {
    path: PathBuf,
    value: Option<Arc<T>>,
}

/// Owns the cached datasets. At most one cached result per input path;
/// [`invalidate`](Self::invalidate) clears all three slots so the next
/// access re-reads the file system.
#[derive(Debug, Default)]
pub struct DataStore {
    paths: DataPaths,
    clean: Option<Slot<Dataset>>,
    raw: Option<Slot<Dataset>>,
    missing: Option<Slot<MissingReport>>,
}

impl DataStore {
    pub fn new(paths: DataPaths) -> Self {
        DataStore {
            paths,
            clean: None,
            raw: None,
            missing: None,
        }
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    /// Point the store at a different data directory. Implies invalidation.
    pub fn set_data_dir(&mut self, dir: &Path) {
        self.paths = DataPaths::from_data_dir(dir);
        self.invalidate();
    }

    /// The cleaned (interpolated) dataset, `None` if the file is absent.
    pub fn clean(&mut self) -> Result<Option<Arc<Dataset>>> {
        fetch(&mut self.clean, &self.paths.clean, loader::load_dataset)
    }

    /// The raw dataset, `None` if the file is absent.
    pub fn raw(&mut self) -> Result<Option<Arc<Dataset>>> {
        fetch(&mut self.raw, &self.paths.raw, loader::load_dataset)
    }

    /// The per-column missing-value report, `None` if the file is absent.
    pub fn missing_report(&mut self) -> Result<Option<Arc<MissingReport>>> {
        fetch(
            &mut self.missing,
            &self.paths.missing,
            loader::load_missing_report,
        )
    }

    /// Drop all cached results. The next access of each input re-reads the
    /// current file-system content.
    pub fn invalidate(&mut self) {
        self.clean = None;
        self.raw = None;
        self.missing = None;
        log::info!("Data caches invalidated");
    }
}

fn fetch<T>(
    slot: &mut Option<Slot<T>>,
    path: &Path,
    load: impl Fn(&Path) -> Result<Option<T>>,
) -> Result<Option<Arc<T>>> {
    if let Some(s) = slot.as_ref() {
        if s.path == path {
            return Ok(s.value.clone());
        }
    }
    let value = load(path)?.map(Arc::new);
    *slot = Some(Slot {
        path: path.to_path_buf(),
        value: value.clone(),
    });
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut f = std::fs::File::create(path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    fn clean_csv(rows: &[(&str, f64)]) -> String {
        let mut s = String::from("DateTime,CO(GT)\n");
        for (ts, v) in rows {
            s.push_str(&format!("{ts},{v}\n"));
        }
        s
    }

    #[test]
    fn caches_until_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DataStore::new(DataPaths::from_data_dir(dir.path()));
        let clean_path = store.paths().clean.clone();

        write_file(&clean_path, &clean_csv(&[("2004-03-10 18:00:00", 2.6)]));
        let first = store.clean().unwrap().unwrap();
        assert_eq!(first.len(), 1);

        // Overwrite on disk; the cached value must still be served.
        write_file(
            &clean_path,
            &clean_csv(&[("2004-03-10 18:00:00", 2.6), ("2004-03-10 19:00:00", 2.0)]),
        );
        let stale = store.clean().unwrap().unwrap();
        assert_eq!(stale.len(), 1);

        // After invalidation the load reflects the current file content.
        store.invalidate();
        let fresh = store.clean().unwrap().unwrap();
        assert_eq!(fresh.len(), 2);
    }

    #[test]
    fn absent_file_is_cached_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DataStore::new(DataPaths::from_data_dir(dir.path()));

        assert!(store.raw().unwrap().is_none());

        // The file appears, but the None result is cached until reload.
        write_file(
            &store.paths().raw.clone(),
            &clean_csv(&[("2004-03-10 18:00:00", 1.0)]),
        );
        assert!(store.raw().unwrap().is_none());

        store.invalidate();
        assert!(store.raw().unwrap().is_some());
    }

    #[test]
    fn invalidate_clears_all_three_slots() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DataStore::new(DataPaths::from_data_dir(dir.path()));

        write_file(
            &store.paths().clean.clone(),
            &clean_csv(&[("2004-03-10 18:00:00", 2.6)]),
        );
        write_file(
            &store.paths().raw.clone(),
            &clean_csv(&[("2004-03-10 18:00:00", 2.6)]),
        );
        write_file(
            &store.paths().missing.clone(),
            "Column,Raw_Missing_%\nCO(GT),13.2\n",
        );

        assert!(store.clean().unwrap().is_some());
        assert!(store.raw().unwrap().is_some());
        assert!(store.missing_report().unwrap().is_some());

        std::fs::remove_file(&store.paths().clean).unwrap();
        std::fs::remove_file(&store.paths().raw).unwrap();
        std::fs::remove_file(&store.paths().missing).unwrap();
        store.invalidate();

        assert!(store.clean().unwrap().is_none());
        assert!(store.raw().unwrap().is_none());
        assert!(store.missing_report().unwrap().is_none());
    }

    #[test]
    fn changing_data_dir_misses_the_cache() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();

        let mut store = DataStore::new(DataPaths::from_data_dir(dir_a.path()));
        write_file(
            &store.paths().clean.clone(),
            &clean_csv(&[("2004-03-10 18:00:00", 2.6)]),
        );
        assert!(store.clean().unwrap().is_some());

        store.set_data_dir(dir_b.path());
        assert!(store.clean().unwrap().is_none());
    }
}
