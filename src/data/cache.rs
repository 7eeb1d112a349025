use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::loader::load_file;
use super::model::TaxiDataset;
use crate::error::Result;

/// Loaded datasets keyed by source path.
///
/// A dataset is parsed once per path and shared read-only afterwards; later
/// loads of the same path return the same `Arc`.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<TaxiDataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, loading it on first use.
    pub fn load(&mut self, path: &Path) -> Result<Arc<TaxiDataset>> {
        if let Some(ds) = self.entries.get(path) {
            log::debug!("Dataset cache hit for {}", path.display());
            return Ok(Arc::clone(ds));
        }

        let dataset = Arc::new(load_file(path)?);
        self.entries.insert(path.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Forget `path` so the next `load` re-reads the file.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn sample_csv() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "passengers,distance,tip,total,color").unwrap();
        writeln!(file, "1,1.5,2.0,12.0,yellow").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn repeated_loads_share_one_dataset() {
        let file = sample_csv();
        let mut cache = DatasetCache::new();
        let first = cache.load(file.path()).unwrap();
        let second = cache.load(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_forces_reload() {
        let file = sample_csv();
        let mut cache = DatasetCache::new();
        let first = cache.load(file.path()).unwrap();
        assert!(cache.invalidate(file.path()));
        let second = cache.load(file.path()).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(!cache.invalidate(Path::new("/nonexistent.csv")));
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let mut cache = DatasetCache::new();
        assert!(cache.load(Path::new("/nonexistent/taxis.csv")).is_err());
        assert!(cache.is_empty());
    }
}
