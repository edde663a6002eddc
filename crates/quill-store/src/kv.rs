//! Key-value backends.
//!
//! - [`MemoryStore`]: process-local map with an optional byte quota
//! - [`JsonFileStore`]: one JSON file per key under a directory

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use quill_core::{Error, KeyValueStore, Result};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

fn poisoned<T>(_: T) -> Error {
    Error::Storage("store lock poisoned".to_string())
}

fn entry_size(key: &str, value: &JsonValue) -> usize {
    key.len() + value.to_string().len()
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-memory store.
///
/// With a quota, a write that would push the total size (key bytes plus
/// serialized value bytes) over the limit fails with
/// [`Error::QuotaExceeded`] and leaves the previous value in place.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, JsonValue>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota_bytes(mut self, limit: usize) -> Self {
        self.quota_bytes = Some(limit);
        self
    }

    /// Current total size as counted against the quota.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .map(|m| m.iter().map(|(k, v)| entry_size(k, v)).sum())
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;

        if let Some(limit) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| entry_size(k, v))
                .sum();
            let needed = others + entry_size(key, &value);
            if needed > limit {
                return Err(Error::QuotaExceeded { needed, limit });
            }
        }

        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().map_err(poisoned)?.remove(key);
        Ok(())
    }

    fn clear_all(&self) -> Result<()> {
        self.entries.write().map_err(poisoned)?.clear();
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

// =============================================================================
// JSON FILE STORE
// =============================================================================

/// File-backed store: `{dir}/{sanitized key}.json`.
///
/// Writes go to a temporary sibling and are renamed into place, so a reader
/// sees either the old value or the new one.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!(component = "json_file_store", dir = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Map a key to a file stem. ASCII alphanumerics, `_` and `-` pass through;
/// every other byte is written as `%XX`, so distinct keys never collide.
pub fn sanitize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

/// Extension of the sibling a value is written to before the rename.
const TEMP_EXTENSION: &str = "json.tmp";

/// Write `data` to `temp_path`, flush it, then rename it over `path`.
fn write_replace(temp_path: &Path, path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp_path, path)
}

/// Value files and temp files left behind by an interrupted write.
fn is_store_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".json") || name.ends_with(".json.tmp")
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<()> {
        let path = self.path_for(key);
        let temp_path = path.with_extension(TEMP_EXTENSION);
        let data = serde_json::to_vec(&value)?;

        if let Err(e) = write_replace(&temp_path, &path, &data) {
            warn!(
                component = "json_file_store",
                key,
                path = %path.display(),
                error = %e,
                "Atomic write failed"
            );
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn clear_all(&self) -> Result<()> {
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if is_store_file(&path) {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "json_file"
    }
}
