//! Persistence bridge
//!
//! Mirrors the three collections into a [`planstore::Store`] under fixed
//! keys, one key per collection so each saves independently.
//!
//! Loading is tolerant per key: a missing or malformed value yields that
//! collection's default (with a warning) without disturbing the others.
//! Saves are refused until the initial load attempt has completed for all
//! three keys, so a failed startup can never clobber saved state with
//! defaults.

use eyre::{Context, Result};
use planstore::Store;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::plan::{Collections, Priorities, Schedule};

/// Store key for the priority slots
pub const KEY_PRIORITIES: &str = "topPriorities";
/// Store key for the inbox ("brain dump") entries
pub const KEY_INBOX: &str = "brainDump";
/// Store key for the schedule map
pub const KEY_SCHEDULE: &str = "timeBlocks";

/// Bridge between the in-memory collections and the key-value store
pub struct PersistBridge {
    store: Store,
    /// Initial load attempted for all three keys; saves are gated on this
    loaded: bool,
}

impl PersistBridge {
    /// Wrap a store; no I/O happens until [`PersistBridge::load_all`]
    pub fn new(store: Store) -> Self {
        Self { store, loaded: false }
    }

    /// Load all three collections, falling back to defaults per key
    ///
    /// Always succeeds; unlocks saving as a side effect.
    pub fn load_all(&mut self) -> Collections {
        debug!("PersistBridge::load_all: called");
        let priorities: Priorities = self.load_key(KEY_PRIORITIES).unwrap_or_default();
        let inbox: Vec<String> = self.load_key(KEY_INBOX).unwrap_or_else(|| vec![String::new()]);
        let schedule: Schedule = self.load_key(KEY_SCHEDULE).unwrap_or_default();
        self.loaded = true;
        info!("Collections loaded from {:?}", self.store.base_path());
        Collections::new(priorities, inbox, schedule)
    }

    /// Read one key, treating read errors and malformed JSON as absent
    fn load_key<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.get_json(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring unreadable value for key '{}': {:#}", key, e);
                None
            }
        }
    }

    /// Save only the collections that differ between two snapshots
    pub fn save_changed(&self, before: &Collections, after: &Collections) -> Result<()> {
        if before.priorities() != after.priorities() {
            self.save_priorities(after.priorities())?;
        }
        if before.inbox() != after.inbox() {
            self.save_inbox(after.inbox())?;
        }
        if before.schedule() != after.schedule() {
            self.save_schedule(after.schedule())?;
        }
        Ok(())
    }

    /// Persist the priority slots
    pub fn save_priorities(&self, priorities: &Priorities) -> Result<()> {
        if !self.guard_loaded(KEY_PRIORITIES) {
            return Ok(());
        }
        self.store
            .set_json(KEY_PRIORITIES, priorities)
            .context("Failed to save priorities")
    }

    /// Persist the inbox entries
    pub fn save_inbox(&self, inbox: &[String]) -> Result<()> {
        if !self.guard_loaded(KEY_INBOX) {
            return Ok(());
        }
        self.store.set_json(KEY_INBOX, &inbox).context("Failed to save inbox")
    }

    /// Persist the schedule map
    pub fn save_schedule(&self, schedule: &Schedule) -> Result<()> {
        if !self.guard_loaded(KEY_SCHEDULE) {
            return Ok(());
        }
        self.store
            .set_json(KEY_SCHEDULE, schedule)
            .context("Failed to save schedule")
    }

    /// Remove all three keys as one logical action
    ///
    /// Key removal cannot clobber saved data, so this is not gated on the
    /// initial load (the CLI `clear` path never loads).
    pub fn clear_all(&self) -> Result<()> {
        info!("PersistBridge::clear_all: removing all keys");
        self.store.remove(KEY_PRIORITIES).context("Failed to remove priorities")?;
        self.store.remove(KEY_INBOX).context("Failed to remove inbox")?;
        self.store.remove(KEY_SCHEDULE).context("Failed to remove schedule")?;
        Ok(())
    }

    fn guard_loaded(&self, key: &str) -> bool {
        if !self.loaded {
            warn!("Refusing to save '{}' before initial load", key);
        }
        self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::ScheduleTask;
    use tempfile::TempDir;

    fn bridge(dir: &TempDir) -> PersistBridge {
        PersistBridge::new(Store::open(dir.path()).unwrap())
    }

    fn sample() -> Collections {
        let mut schedule = Schedule::new();
        schedule.insert("9-00".parse().unwrap(), vec![ScheduleTask::new("standup")]);
        Collections::new(
            ["A".to_string(), String::new(), String::new()],
            vec!["B".to_string(), String::new()],
            schedule,
        )
    }

    #[test]
    fn test_first_run_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let mut b = bridge(&dir);
        assert_eq!(b.load_all(), Collections::default());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut b = bridge(&dir);
        b.load_all();

        let collections = sample();
        b.save_changed(&Collections::default(), &collections).unwrap();

        let mut b2 = bridge(&dir);
        assert_eq!(b2.load_all(), collections);
    }

    #[test]
    fn test_no_save_before_load() {
        let dir = TempDir::new().unwrap();
        let b = bridge(&dir);
        // not loaded yet: save must be a silent no-op, not an overwrite
        b.save_priorities(sample().priorities()).unwrap();

        let store = Store::open(dir.path()).unwrap();
        assert_eq!(store.get(KEY_PRIORITIES).unwrap(), None);
    }

    #[test]
    fn test_malformed_key_falls_back_alone() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store.set(KEY_SCHEDULE, "{not json").unwrap();
        store.set(KEY_PRIORITIES, r#"["A","",""]"#).unwrap();
        store.set(KEY_INBOX, r#"["B",""]"#).unwrap();

        let mut b = bridge(&dir);
        let loaded = b.load_all();
        assert!(loaded.schedule().is_empty());
        assert_eq!(loaded.priorities()[0], "A");
        assert_eq!(loaded.inbox()[0], "B");
    }

    #[test]
    fn test_wrong_shape_priorities_falls_back() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        // four entries cannot deserialize into three fixed slots
        store.set(KEY_PRIORITIES, r#"["a","b","c","d"]"#).unwrap();

        let mut b = bridge(&dir);
        let loaded = b.load_all();
        assert_eq!(loaded.priorities(), Collections::default().priorities());
    }

    #[test]
    fn test_clear_all_removes_keys() {
        let dir = TempDir::new().unwrap();
        let mut b = bridge(&dir);
        b.load_all();
        b.save_changed(&Collections::default(), &sample()).unwrap();

        b.clear_all().unwrap();
        let store = Store::open(dir.path()).unwrap();
        assert_eq!(store.get(KEY_PRIORITIES).unwrap(), None);
        assert_eq!(store.get(KEY_INBOX).unwrap(), None);
        assert_eq!(store.get(KEY_SCHEDULE).unwrap(), None);
    }

    #[test]
    fn test_save_changed_writes_only_diffs() {
        let dir = TempDir::new().unwrap();
        let mut b = bridge(&dir);
        let base = b.load_all();

        let mut next = base.clone();
        next.set_priority_text(0, "A");
        b.save_changed(&base, &next).unwrap();

        let store = Store::open(dir.path()).unwrap();
        assert!(store.get(KEY_PRIORITIES).unwrap().is_some());
        assert_eq!(store.get(KEY_INBOX).unwrap(), None);
        assert_eq!(store.get(KEY_SCHEDULE).unwrap(), None);
    }
}
