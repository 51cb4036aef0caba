//! Immutable snapshot of the legs and nodes tables.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use crate::import::{self, LoadError, LoadReport};
use crate::log;
use crate::models::{ConnectionLeg, Mode, NodeTable};
use crate::time::DepartureTime;

/// Both source tables, loaded once and never mutated
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    legs: Vec<ConnectionLeg>,
    nodes: NodeTable,
    report: LoadReport,
}

impl Dataset {
    /// Build a snapshot from in-memory tables, with a report that only counts legs
    #[must_use]
    pub fn new(legs: Vec<ConnectionLeg>, nodes: NodeTable) -> Self {
        let report = LoadReport {
            legs: legs.len(),
            ..LoadReport::default()
        };
        Self::with_report(legs, nodes, report)
    }

    /// Build a snapshot keeping the loader's report
    #[must_use]
    pub fn with_report(legs: Vec<ConnectionLeg>, nodes: NodeTable, report: LoadReport) -> Self {
        Self { legs, nodes, report }
    }

    /// Load both tables from CSV files
    ///
    /// # Errors
    ///
    /// Returns the first load error of either file.
    pub fn load(legs_path: &Path, nodes_path: &Path) -> Result<Self, LoadError> {
        let (legs, report) = import::load_legs(legs_path)?;
        let nodes = import::load_nodes(nodes_path)?;
        log!("Loaded {} legs and {} nodes", legs.len(), nodes.len());
        Ok(Self::with_report(legs, nodes, report))
    }

    #[must_use]
    pub fn legs(&self) -> &[ConnectionLeg] {
        &self.legs
    }

    #[must_use]
    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    #[must_use]
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    fn legs_on_path<'a, 'p>(&'a self, path: &'p str) -> impl Iterator<Item = &'a ConnectionLeg> + use<'a, 'p> {
        self.legs.iter().filter(move |leg| leg.connection_full_path == path)
    }

    /// Sorted distinct connection paths
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        self.legs
            .iter()
            .map(|leg| leg.connection_full_path.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted distinct origin codes of legs on `path`
    #[must_use]
    pub fn origins(&self, path: &str) -> Vec<&str> {
        self.legs_on_path(path)
            .map(|leg| leg.origin.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted distinct departure times of legs on `path`
    #[must_use]
    pub fn departure_times(&self, path: &str) -> Vec<DepartureTime> {
        self.legs_on_path(path)
            .map(|leg| leg.departure)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct modes of legs on `path`, in first-seen order
    #[must_use]
    pub fn modes(&self, path: &str) -> Vec<&Mode> {
        let mut modes: Vec<&Mode> = Vec::new();
        for leg in self.legs_on_path(path) {
            if !modes.contains(&&leg.mode) {
                modes.push(&leg.mode);
            }
        }
        modes
    }
}

/// Holds the current snapshot; readers keep their `Arc` even across a reload
#[derive(Debug, Default)]
pub struct DatasetStore {
    current: RwLock<Arc<Dataset>>,
}

impl DatasetStore {
    #[must_use]
    pub fn new(dataset: Dataset) -> Self {
        Self {
            current: RwLock::new(Arc::new(dataset)),
        }
    }

    /// The snapshot in use right now
    #[must_use]
    pub fn current(&self) -> Arc<Dataset> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in a new snapshot, returning the previous one
    pub fn replace(&self, dataset: Dataset) -> Arc<Dataset> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(dataset))
    }

    /// Load fresh tables and swap them in; the old snapshot stays if loading fails
    ///
    /// # Errors
    ///
    /// Returns the load error, leaving the current snapshot untouched.
    pub fn reload(&self, legs_path: &Path, nodes_path: &Path) -> Result<Arc<Dataset>, LoadError> {
        let dataset = Arc::new(Dataset::load(legs_path, nodes_path)?);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&dataset);
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::leg::test_support::leg;
    use crate::models::Node;
    use std::fs;

    const LEGS_CSV: &str = "connection_full,LEG_ORIGIN_CODE,LEG_DEST_CODE,Connection Departure Time,Mode,SLA_COLOR,time_diff_min
DEL-BOM,DEL,BOM,09:00,AIR,RED,-12
,BOM,GOI,10:00,SURFACE,GREEN,5
DEL-BOM,DEL,BOM,21:15,AIR,AMBER,3
";
    const NODES_CSV: &str = "CODE,lat,lon\nDEL,28.61,77.20\nBOM,19.07,72.87\n";

    fn write_tables(dir: &tempfile::TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
        let legs = dir.path().join("result.csv");
        let nodes = dir.path().join("nodes.csv");
        fs::write(&legs, LEGS_CSV).expect("write legs");
        fs::write(&nodes, NODES_CSV).expect("write nodes");
        (legs, nodes)
    }

    fn dataset() -> Dataset {
        let legs = vec![
            leg("P2", "BLR", "MAA", "10:00", "SURFACE", "GREEN"),
            leg("P1", "DEL", "BOM", "09:00", "AIR", "RED"),
            leg("P1", "BOM", "GOI", "08:00", "SURFACE", "GREEN"),
            leg("P1", "DEL", "BOM", "09:00", "AIR", "ORANGE"),
        ];
        let nodes = NodeTable::from_nodes([Node::new("DEL", 28.61, 77.20)]).expect("unique codes");
        Dataset::new(legs, nodes)
    }

    #[test]
    fn test_paths_sorted_distinct() {
        assert_eq!(dataset().paths(), vec!["P1", "P2"]);
    }

    #[test]
    fn test_origins_for_path() {
        assert_eq!(dataset().origins("P1"), vec!["BOM", "DEL"]);
        assert!(dataset().origins("missing").is_empty());
    }

    #[test]
    fn test_departure_times_for_path() {
        let times: Vec<String> = dataset().departure_times("P1").iter().map(ToString::to_string).collect();
        assert_eq!(times, vec!["08:00", "09:00"]);
    }

    #[test]
    fn test_modes_first_seen_order() {
        let dataset = dataset();
        let modes: Vec<&str> = dataset.modes("P1").into_iter().map(Mode::as_str).collect();
        assert_eq!(modes, vec!["AIR", "SURFACE"]);
    }

    #[test]
    fn test_store_replace_keeps_old_snapshot_alive() {
        let store = DatasetStore::new(dataset());
        let before = store.current();
        assert_eq!(before.legs().len(), 4);

        let old = store.replace(Dataset::default());
        assert!(Arc::ptr_eq(&old, &before));
        assert_eq!(before.legs().len(), 4);
        assert!(store.current().legs().is_empty());
    }

    #[test]
    fn test_store_failed_reload_keeps_snapshot() {
        let store = DatasetStore::new(dataset());
        let result = store.reload(Path::new("/no/legs.csv"), Path::new("/no/nodes.csv"));
        assert!(result.is_err());
        assert_eq!(store.current().legs().len(), 4);
    }

    #[test]
    fn test_load_from_files_keeps_report() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (legs, nodes) = write_tables(&dir);
        let dataset = Dataset::load(&legs, &nodes).expect("should load");

        assert_eq!(dataset.legs().len(), 2);
        assert_eq!(dataset.nodes().len(), 2);
        assert_eq!(dataset.report().skipped_without_path, 1);
        assert_eq!(dataset.report().unrecognized_sla.get("AMBER"), Some(&1));
    }

    #[test]
    fn test_store_reload_returns_loaded_snapshot() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (legs, nodes) = write_tables(&dir);
        let store = DatasetStore::new(dataset());
        let before = store.current();

        let loaded = store.reload(&legs, &nodes).expect("should reload");
        assert!(Arc::ptr_eq(&loaded, &store.current()));
        assert_eq!(loaded.legs().len(), 2);
        assert_eq!(before.legs().len(), 4);
    }

    #[test]
    fn test_origins_outlive_path_argument() {
        let dataset = dataset();
        let origins = {
            let path = String::from("P1");
            dataset.origins(&path)
        };
        assert_eq!(origins, vec!["BOM", "DEL"]);
    }
}
