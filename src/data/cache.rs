use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::loader::{load_file, LoadError};
use super::model::TransactionTable;

// ---------------------------------------------------------------------------
// DatasetCache – memoized loads keyed on path + mtime
// ---------------------------------------------------------------------------

struct CacheEntry {
    modified: Option<SystemTime>,
    table: Arc<TransactionTable>,
}

/// Loaded tables keyed on their canonical path.
///
/// An entry is reused while the file's modification time is unchanged and
/// reloaded otherwise. Owned by whoever drives the dashboard; nothing global.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, loading it on a miss or when the
    /// file changed on disk since it was cached.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<TransactionTable>, LoadError> {
        let key = path.canonicalize().map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let modified = std::fs::metadata(&key).and_then(|m| m.modified()).ok();

        if let Some(entry) = self.entries.get(&key) {
            if entry.modified == modified {
                log::debug!("dataset cache hit: {}", key.display());
                return Ok(Arc::clone(&entry.table));
            }
            log::debug!("dataset changed on disk, reloading: {}", key.display());
        } else {
            log::debug!("dataset cache miss: {}", key.display());
        }

        let table = Arc::new(load_file(&key)?);
        self.entries.insert(
            key,
            CacheEntry {
                modified,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    /// Drop the entry for `path` so the next access reloads it.
    pub fn invalidate(&mut self, path: &Path) {
        if let Ok(key) = path.canonicalize() {
            self.entries.remove(&key);
        }
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
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn write_orders(rows: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp file");
        writeln!(file, "Order ID,Order Date,Customer ID,Region,Category,Sales,Profit").unwrap();
        for i in 0..rows {
            writeln!(file, "O{i},2023-01-0{},C{i},West,Tech,10,1", i % 9 + 1).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn unchanged_file_is_served_from_cache() {
        let file = write_orders(3);
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(file.path()).expect("first load");
        let second = cache.get_or_load(file.path()).expect("second load");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 3);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn modified_file_is_reloaded() {
        let mut file = write_orders(2);
        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(file.path()).expect("first load");

        writeln!(file, "O9,2023-02-01,C9,East,Office,5,1").unwrap();
        file.flush().unwrap();
        let later = SystemTime::now() + Duration::from_secs(5);
        file.as_file().set_modified(later).expect("bump mtime");

        let second = cache.get_or_load(file.path()).expect("reload");
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 3);
    }

    #[test]
    fn invalidate_forces_reload() {
        let file = write_orders(1);
        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(file.path()).expect("load");
        cache.invalidate(file.path());
        assert!(cache.is_empty());
        let second = cache.get_or_load(file.path()).expect("reload");
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let mut cache = DatasetCache::new();
        assert!(matches!(
            cache.get_or_load(Path::new("/no/such/orders.csv")),
            Err(LoadError::Io { .. })
        ));
    }
}
