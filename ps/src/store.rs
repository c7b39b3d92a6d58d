//! Core Store implementation

use eyre::{Context, Result, bail};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// The key-value store: one JSON document per key, one file per document.
///
/// Values are stored as raw JSON text; callers decide the schema. A `get`
/// for an absent key returns `Ok(None)` rather than an error so readers can
/// fall back to defaults without special-casing first runs.
pub struct Store {
    /// Base path for storage
    base_path: PathBuf,
}

impl Store {
    /// Open or create a store at the given directory
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;
        debug!("Opened plan store at {:?}", base_path);
        Ok(Self { base_path })
    }

    /// Base directory this store reads and writes
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Fetch the raw JSON text stored under `key`, if any
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        debug!("Store::get: key={} path={:?}", key, path);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read key '{}'", key)),
        }
    }

    /// Store raw JSON text under `key`, replacing any previous value
    ///
    /// Writes go through a sibling temp file and an atomic rename so a crash
    /// mid-write never leaves a truncated value behind.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        debug!("Store::set: key={} bytes={}", key, value.len());
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).with_context(|| format!("Failed to write key '{}'", key))?;
        fs::rename(&tmp, &path).with_context(|| format!("Failed to commit key '{}'", key))?;
        Ok(())
    }

    /// Remove the value stored under `key`; absent keys are not an error
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        debug!("Store::remove: key={}", key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Store::remove: key '{}' already absent", key);
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to remove key '{}'", key)),
        }
    }

    /// List all keys currently present in the store
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.base_path).context("Failed to list store directory")? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                warn!("Store::keys: skipping non-store file {:?}", path);
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Fetch and deserialize the value under `key`
    ///
    /// Absent key is `Ok(None)`; present-but-malformed JSON is an error the
    /// caller may choose to treat as absent.
    pub fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(text) => {
                let value = serde_json::from_str(&text)
                    .with_context(|| format!("Malformed JSON under key '{}'", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Serialize and store a value under `key`
    pub fn set_json<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value).with_context(|| format!("Failed to serialize key '{}'", key))?;
        self.set(key, &text)
    }

    /// Map a key to its file path, rejecting anything filesystem-unsafe
    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            bail!("Invalid store key '{}'", key);
        }
        Ok(self.base_path.join(format!("{}.json", key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_absent_key_is_none() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        assert_eq!(store.get("topPriorities").unwrap(), None);
    }

    #[test]
    fn test_set_get_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store.set("brainDump", r#"["a",""]"#).unwrap();
        assert_eq!(store.get("brainDump").unwrap().as_deref(), Some(r#"["a",""]"#));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store.set("timeBlocks", "{}").unwrap();
        store.remove("timeBlocks").unwrap();
        store.remove("timeBlocks").unwrap();
        assert_eq!(store.get("timeBlocks").unwrap(), None);
    }

    #[test]
    fn test_keys_lists_sorted_stems() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store.set("timeBlocks", "{}").unwrap();
        store.set("brainDump", "[]").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["brainDump".to_string(), "timeBlocks".to_string()]);
    }

    #[test]
    fn test_invalid_key_rejected() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        assert!(store.set("../escape", "{}").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_get_json_typed() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store.set_json("topPriorities", &vec!["a".to_string(), String::new(), String::new()]).unwrap();
        let loaded: Option<Vec<String>> = store.get_json("topPriorities").unwrap();
        assert_eq!(loaded.unwrap()[0], "a");
    }

    #[test]
    fn test_get_json_malformed_is_error() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store.set("timeBlocks", "{not json").unwrap();
        let loaded: Result<Option<serde_json::Value>> = store.get_json("timeBlocks");
        assert!(loaded.is_err());
    }
}
