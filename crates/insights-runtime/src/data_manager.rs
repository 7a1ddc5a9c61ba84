//! Caller-owned cache around the transaction loader.
//!
//! [`DataManager::get_data`] returns the cleaned dataset for a path, loading
//! it on first use and whenever the path or the file's fingerprint (length
//! and modification time) changes. A failed load clears the cache and is
//! returned to the caller; stale data is never served after a failure.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use insights_core::error::{InsightsError, Result};
use insights_data::reader::{load_transactions, LoadOptions, LoadedDataset};

// ── SourceFingerprint ─────────────────────────────────────────────────────────

/// Cheap identity of a file's contents.
///
/// Only length and modification time are compared, so an edit that keeps the
/// size and restores the mtime (`cp -p`, `touch -r`) is not seen as a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFingerprint {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceFingerprint {
    /// Read the fingerprint of `path`.
    pub fn of(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                InsightsError::SourceNotFound(path.to_path_buf())
            } else {
                InsightsError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        Ok(Self {
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

struct CacheEntry {
    path: PathBuf,
    fingerprint: SourceFingerprint,
    dataset: Arc<LoadedDataset>,
    loaded_at: Instant,
}

// ── DataManager ───────────────────────────────────────────────────────────────

/// Explicit, single-entry cache of the cleaned dataset.
///
/// # Example
/// ```no_run
/// use insights_data::reader::LoadOptions;
/// use insights_runtime::data_manager::DataManager;
///
/// let mut mgr = DataManager::new(LoadOptions::default());
/// let dataset = mgr.get_data("sales.csv".as_ref()).expect("load");
/// println!("rows: {}", dataset.records.len());
/// ```
pub struct DataManager {
    options: LoadOptions,
    cache: Option<CacheEntry>,
    last_error: Option<String>,
    load_count: u64,
}

impl DataManager {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            cache: None,
            last_error: None,
            load_count: 0,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the dataset for `path`, reloading when the cache does not
    /// match the path or the file has changed since it was loaded.
    ///
    /// Change detection goes through [`SourceFingerprint`] and misses
    /// same-size rewrites whose mtime was restored. Call
    /// [`invalidate_cache`](Self::invalidate_cache) to force a reload then.
    pub fn get_data(&mut self, path: &Path) -> Result<Arc<LoadedDataset>> {
        let fingerprint = match SourceFingerprint::of(path) {
            Ok(fp) => fp,
            Err(e) => return Err(self.fail(e)),
        };

        if let Some(entry) = &self.cache {
            if entry.path == path && entry.fingerprint == fingerprint {
                tracing::debug!(path = %path.display(), "returning cached dataset");
                return Ok(Arc::clone(&entry.dataset));
            }
            tracing::debug!(path = %path.display(), "source changed; reloading");
        }

        match load_transactions(path, self.options) {
            Ok(dataset) => {
                let dataset = Arc::new(dataset);
                self.load_count += 1;
                self.last_error = None;
                self.cache = Some(CacheEntry {
                    path: path.to_path_buf(),
                    fingerprint,
                    dataset: Arc::clone(&dataset),
                    loaded_at: Instant::now(),
                });
                tracing::debug!(
                    rows = dataset.records.len(),
                    loads = self.load_count,
                    "dataset cache updated"
                );
                Ok(dataset)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Discard the cached dataset, forcing the next [`get_data`] to load.
    ///
    /// [`get_data`]: DataManager::get_data
    pub fn invalidate_cache(&mut self) {
        self.cache = None;
        tracing::debug!("cache invalidated");
    }

    /// Age of the cached dataset, or `None` if nothing is cached.
    pub fn cache_age(&self) -> Option<Duration> {
        self.cache.as_ref().map(|entry| entry.loaded_at.elapsed())
    }

    /// Path of the cached dataset, if any.
    pub fn cached_path(&self) -> Option<&Path> {
        self.cache.as_ref().map(|entry| entry.path.as_path())
    }

    /// Human-readable description of the last load failure, or `None`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of successful loads performed so far.
    pub fn load_count(&self) -> u64 {
        self.load_count
    }

    pub fn options(&self) -> LoadOptions {
        self.options
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn fail(&mut self, err: InsightsError) -> InsightsError {
        tracing::warn!(error = %err, "load failed; cache cleared");
        self.cache = None;
        self.last_error = Some(err.to_string());
        err
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use insights_core::models::LoadMode;
    use tempfile::TempDir;

    const HEADER: &str = "InvoiceDate,Description,Quantity,UnitPrice,CustomerID\n";

    fn write_csv(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, format!("{HEADER}{body}")).expect("write csv");
        path
    }

    // ── cache miss on first call ──────────────────────────────────────────

    #[test]
    fn test_cache_empty_before_first_call() {
        let mgr = DataManager::new(LoadOptions::default());
        assert!(mgr.cache_age().is_none());
        assert!(mgr.cached_path().is_none());
        assert!(mgr.last_error().is_none());
        assert_eq!(mgr.load_count(), 0);
    }

    // ── cache hit on unchanged file ───────────────────────────────────────

    #[test]
    fn test_cache_hit_for_same_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(&dir, "sales.csv", "2011-01-05 09:00,Mug,3,2.00,A\n");
        let mut mgr = DataManager::new(LoadOptions::default());

        let first = mgr.get_data(&path).expect("first load");
        let second = mgr.get_data(&path).expect("second load");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(mgr.load_count(), 1);
        assert_eq!(mgr.cached_path(), Some(path.as_path()));
        assert!(mgr.cache_age().expect("cached") < Duration::from_secs(5));
    }

    // ── invalidation ──────────────────────────────────────────────────────

    #[test]
    fn test_reload_after_content_change() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(&dir, "sales.csv", "2011-01-05 09:00,Mug,3,2.00,A\n");
        let mut mgr = DataManager::new(LoadOptions::default());

        let first = mgr.get_data(&path).expect("first load");
        assert_eq!(first.records.len(), 1);

        // A longer file changes the fingerprint even if mtime granularity
        // is coarse.
        write_csv(
            &dir,
            "sales.csv",
            "2011-01-05 09:00,Mug,3,2.00,A\n2011-02-01 11:00,Pen,5,1.00,A\n",
        );

        let second = mgr.get_data(&path).expect("reload");
        assert_eq!(second.records.len(), 2);
        assert_eq!(mgr.load_count(), 2);
        // The first handle still sees the old, immutable data.
        assert_eq!(first.records.len(), 1);
    }

    #[test]
    fn test_reload_on_path_change() {
        let dir = TempDir::new().expect("tempdir");
        let a = write_csv(&dir, "a.csv", "2011-01-05 09:00,Mug,3,2.00,A\n");
        let b = write_csv(&dir, "b.csv", "2011-01-05 09:00,Mug,3,2.00,A\n");
        let mut mgr = DataManager::new(LoadOptions::default());

        mgr.get_data(&a).expect("load a");
        mgr.get_data(&b).expect("load b");

        assert_eq!(mgr.load_count(), 2);
        assert_eq!(mgr.cached_path(), Some(b.as_path()));
    }

    #[test]
    fn test_invalidate_cache_forces_reload() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(&dir, "sales.csv", "2011-01-05 09:00,Mug,3,2.00,A\n");
        let mut mgr = DataManager::new(LoadOptions::default());

        mgr.get_data(&path).expect("load");
        mgr.invalidate_cache();
        assert!(mgr.cache_age().is_none());

        mgr.get_data(&path).expect("reload");
        assert_eq!(mgr.load_count(), 2);
    }

    #[test]
    fn test_same_size_edit_with_restored_mtime_needs_invalidate() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(&dir, "sales.csv", "2011-01-05 09:00,Mug,3,2.00,A\n");
        let mut mgr = DataManager::new(LoadOptions::default());

        let first = mgr.get_data(&path).expect("load");
        let mtime = std::fs::metadata(&path).expect("metadata").modified().expect("mtime");

        write_csv(&dir, "sales.csv", "2011-01-05 09:00,Cup,3,2.00,A\n");
        std::fs::File::options()
            .write(true)
            .open(&path)
            .expect("open")
            .set_modified(mtime)
            .expect("restore mtime");

        let cached = mgr.get_data(&path).expect("cached");
        assert!(Arc::ptr_eq(&first, &cached));
        assert_eq!(cached.records[0].description, "Mug");

        mgr.invalidate_cache();
        let fresh = mgr.get_data(&path).expect("reload");
        assert_eq!(fresh.records[0].description, "Cup");
        assert_eq!(mgr.load_count(), 2);
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn test_missing_file_reports_source_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let mut mgr = DataManager::new(LoadOptions::default());

        let err = mgr.get_data(&dir.path().join("gone.csv")).unwrap_err();
        assert!(err.is_missing_source());
        assert!(mgr.last_error().expect("error recorded").contains("gone.csv"));
    }

    #[test]
    fn test_failed_reload_clears_cache() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(&dir, "sales.csv", "2011-01-05 09:00,Mug,3,2.00,A\n");
        let mut mgr = DataManager::new(LoadOptions::new(LoadMode::Strict));

        mgr.get_data(&path).expect("load");
        write_csv(
            &dir,
            "sales.csv",
            "2011-01-05 09:00,Mug,3,2.00,A\nnot-a-date,Mug,3,2.00,A\n",
        );

        let err = mgr.get_data(&path).unwrap_err();
        assert!(err.is_malformed_input());
        assert!(mgr.cached_path().is_none());
    }

    #[test]
    fn test_lenient_options_are_forwarded() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(
            &dir,
            "sales.csv",
            "2011-01-05 09:00,Mug,3,2.00,A\nnot-a-date,Mug,3,2.00,A\n",
        );
        let mut mgr = DataManager::new(LoadOptions::new(LoadMode::Lenient));

        let dataset = mgr.get_data(&path).expect("lenient load");
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.report.rejected.len(), 1);
        assert_eq!(mgr.options().mode, LoadMode::Lenient);
    }
}
