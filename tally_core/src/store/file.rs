//! # File-Backed Store
//!
//! Keeps every key in one JSON document on disk:
//! - **Atomic saves**: write to `.tmp`, fsync, rename over the original
//! - **File locking**: an exclusive OS lock on a sibling `.lock` file for as
//!   long as the [`FileStore`] lives, so two calculator sessions never
//!   overwrite each other's history
//! - **Version validation**: documents from a newer schema are refused
//!
//! ## File Format
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "saved_at": "2026-10-16T09:30:00Z",
//!   "entries": {
//!     "calculator-theme": "dark",
//!     "calculator-history": "[{\"expression\":\"2 + 3 =\",\"result\":\"5\"}]"
//!   }
//! }
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use tally_core::store::{FileStore, KeyValueStore, THEME_KEY};
//! use std::path::Path;
//!
//! let mut store = FileStore::open(Path::new("store.json"))?;
//! store.set(THEME_KEY, "dark")?;
//!
//! // Lock is released when dropped
//! drop(store);
//! # Ok::<(), tally_core::errors::CalcError>(())
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use super::KeyValueStore;
use crate::errors::{CalcError, CalcResult};

/// Current schema version for store documents
pub const STORE_SCHEMA_VERSION: &str = "0.1.0";

/// On-disk layout of a store file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Schema version (for migration compatibility)
    pub version: String,
    /// When the document was last written
    pub saved_at: DateTime<Utc>,
    /// Stored values, sorted by key for stable diffs
    pub entries: BTreeMap<String, String>,
}

impl StoreDocument {
    pub fn new() -> Self {
        StoreDocument {
            version: STORE_SCHEMA_VERSION.to_string(),
            saved_at: Utc::now(),
            entries: BTreeMap::new(),
        }
    }
}

impl Default for StoreDocument {
    fn default() -> Self {
        StoreDocument::new()
    }
}

/// Lock file metadata, written so a refused session can say who holds the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LockInfo {
    pid: u32,
    locked_at: DateTime<Utc>,
}

/// Key-value store persisted to a single JSON file.
///
/// Every `set`/`remove` rewrites the file atomically. The lock is released
/// and the `.lock` file removed when the store is dropped.
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    document: StoreDocument,
}

impl FileStore {
    /// Lock and load the store at `path`.
    ///
    /// A missing file is an empty store; parent directories are created.
    ///
    /// # Returns
    ///
    /// * `Ok(FileStore)` - Lock acquired and document loaded
    /// * `Err(CalcError::FileLocked)` - Another session holds the store
    /// * `Err(CalcError::VersionMismatch)` - Document is from a newer schema
    /// * `Err(CalcError::SerializationError)` - Document is not valid JSON
    pub fn open(path: &Path) -> CalcResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                CalcError::file_error("create directory", parent.display().to_string(), e.to_string())
            })?;
        }

        let lock_path = lock_path_for(path);
        let lock_file = acquire_lock(path, &lock_path)?;

        let document = if path.exists() {
            load_document(path)?
        } else {
            StoreDocument::new()
        };
        tracing::debug!(path = %path.display(), keys = document.entries.len(), "opened store");

        Ok(FileStore {
            path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            document,
        })
    }

    /// Path to the store document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The loaded document
    pub fn document(&self) -> &StoreDocument {
        &self.document
    }

    fn save(&mut self) -> CalcResult<()> {
        self.document.saved_at = Utc::now();
        save_document(&self.document, &self.path)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> CalcResult<Option<String>> {
        Ok(self.document.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CalcResult<()> {
        self.document.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> CalcResult<()> {
        if self.document.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        // OS lock is released when _lock_file is dropped
        let _ = fs::remove_file(&self.lock_path);
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("keys", &self.document.entries.len())
            .finish()
    }
}

/// Get the lock file path for a store file
fn lock_path_for(store_path: &Path) -> PathBuf {
    let mut lock_path = store_path.to_path_buf();
    let extension = store_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

/// Take the exclusive OS lock and stamp the lock file with our pid.
///
/// The lock file is opened without truncation so a refused session can still
/// read the holder's metadata.
fn acquire_lock(store_path: &Path, lock_path: &Path) -> CalcResult<File> {
    let mut lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .map_err(|e| CalcError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

    if lock_file.try_lock_exclusive().is_err() {
        let (locked_by, locked_at) = match read_lock_info(&mut lock_file) {
            Some(info) => (format!("pid {}", info.pid), info.locked_at.to_rfc3339()),
            None => ("another process".to_string(), "unknown".to_string()),
        };
        tracing::warn!(path = %store_path.display(), %locked_by, "store is locked");
        return Err(CalcError::file_locked(store_path.display().to_string(), locked_by, locked_at));
    }

    let info = LockInfo {
        pid: std::process::id(),
        locked_at: Utc::now(),
    };
    let lock_json = serde_json::to_string_pretty(&info).map_err(CalcError::serialization)?;

    lock_file
        .set_len(0)
        .and_then(|_| lock_file.write_all(lock_json.as_bytes()))
        .and_then(|_| lock_file.sync_all())
        .map_err(|e| CalcError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

    Ok(lock_file)
}

fn read_lock_info(lock_file: &mut File) -> Option<LockInfo> {
    let mut contents = String::new();
    lock_file.read_to_string(&mut contents).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Write a document with atomic write semantics.
///
/// 1. Serialize to JSON
/// 2. Write to a temporary file (.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename over the target (atomic on most filesystems)
fn save_document(document: &StoreDocument, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(document).map_err(CalcError::serialization)?;

    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::trace!(path = %path.display(), "saved store");
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp_path = path.to_path_buf();
    let extension = path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    tmp_path.set_extension(extension);
    tmp_path
}

fn load_document(path: &Path) -> CalcResult<StoreDocument> {
    let mut file = File::open(path)
        .map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let document: StoreDocument = serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?;

    validate_version(&document.version)?;

    Ok(document)
}

/// Validate that a document version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: STORE_SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = STORE_SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions, a newer minor version may contain breaking changes
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{HISTORY_KEY, THEME_KEY};
    use std::env::temp_dir;

    fn temp_store_path(name: &str) -> PathBuf {
        temp_dir().join(format!("tally_test_{}_{}.json", name, std::process::id()))
    }

    fn cleanup(path: &Path) {
        let _ = fs::remove_file(path);
        let _ = fs::remove_file(lock_path_for(path));
        let _ = fs::remove_file(tmp_path_for(path));
    }

    #[test]
    fn test_lock_path_generation() {
        let store_path = Path::new("/path/to/store.json");
        assert_eq!(lock_path_for(store_path), Path::new("/path/to/store.json.lock"));
        assert_eq!(tmp_path_for(store_path), Path::new("/path/to/store.json.tmp"));
        assert_eq!(lock_path_for(Path::new("store")), Path::new("store.lock"));
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let path = temp_store_path("missing");
        cleanup(&path);

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap(), None);
        assert!(!path.exists());

        drop(store);
        cleanup(&path);
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_store_path("reopen");
        cleanup(&path);

        let mut store = FileStore::open(&path).unwrap();
        store.set(THEME_KEY, "dark").unwrap();
        store.set(HISTORY_KEY, "[]").unwrap();
        drop(store);

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(store.document().version, STORE_SCHEMA_VERSION);

        drop(store);
        cleanup(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_store_path("atomic");
        cleanup(&path);

        let mut store = FileStore::open(&path).unwrap();
        store.set(THEME_KEY, "light").unwrap();

        assert!(path.exists());
        assert!(!tmp_path_for(&path).exists());

        drop(store);
        cleanup(&path);
    }

    #[test]
    fn test_second_session_is_locked_out() {
        let path = temp_store_path("locked");
        cleanup(&path);

        let store = FileStore::open(&path).unwrap();
        assert!(lock_path_for(&path).exists());

        let err = FileStore::open(&path).unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");
        assert!(err.is_recoverable());

        drop(store);
        assert!(!lock_path_for(&path).exists());

        // Free again after the first session ends
        let store = FileStore::open(&path).unwrap();
        drop(store);
        cleanup(&path);
    }

    #[test]
    fn test_remove_key() {
        let path = temp_store_path("remove");
        cleanup(&path);

        let mut store = FileStore::open(&path).unwrap();
        store.set(THEME_KEY, "dark").unwrap();
        store.remove(THEME_KEY).unwrap();
        store.remove("never-set").unwrap();
        drop(store);

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap(), None);

        drop(store);
        cleanup(&path);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let path = temp_store_path("garbage");
        cleanup(&path);
        fs::write(&path, "{ not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");

        cleanup(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(STORE_SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_newer_document_is_refused() {
        let path = temp_store_path("newer");
        cleanup(&path);

        let mut document = StoreDocument::new();
        document.version = "0.9.0".to_string();
        fs::write(&path, serde_json::to_string(&document).unwrap()).unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        cleanup(&path);
    }
}
