//! The three planning collections
//!
//! `Collections` is the single owner of the priorities, inbox, and schedule
//! data. Everything else works on snapshots (clones) and hands back whole
//! values through the `replace_*` operations; nothing outside this type holds
//! a long-lived mutable reference into a collection.
//!
//! Invariants enforced on every write:
//! - the inbox never drops below one entry
//! - the schedule never maps a slot key to an empty task list

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::slot::SlotKey;

/// Number of top-priority slots
pub const PRIORITY_SLOTS: usize = 3;

/// Fixed-length priority slots; empty string means unset
pub type Priorities = [String; PRIORITY_SLOTS];

/// Schedule: slot key -> ordered tasks, keys present only while non-empty
pub type Schedule = BTreeMap<SlotKey, Vec<ScheduleTask>>;

/// One task placed on the schedule grid
///
/// The completed flag belongs to this placement alone; the same text in the
/// inbox or a priority slot is unaffected by toggling it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleTask {
    pub text: String,
    pub completed: bool,
}

impl ScheduleTask {
    /// A fresh, not-yet-completed task
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

/// The three planning collections, invariants enforced on every write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collections {
    priorities: Priorities,
    inbox: Vec<String>,
    schedule: Schedule,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            priorities: Priorities::default(),
            inbox: vec![String::new()],
            schedule: Schedule::new(),
        }
    }
}

impl Collections {
    /// Build from raw parts, normalizing each collection
    pub fn new(priorities: Priorities, inbox: Vec<String>, mut schedule: Schedule) -> Self {
        schedule.retain(|_, tasks| !tasks.is_empty());
        Self {
            priorities,
            inbox: normalized_inbox(inbox),
            schedule,
        }
    }

    pub fn priorities(&self) -> &Priorities {
        &self.priorities
    }

    pub fn inbox(&self) -> &[String] {
        &self.inbox
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Replace the priority slots wholesale
    pub fn replace_priorities(&mut self, new: Priorities) {
        debug!("Collections::replace_priorities: called");
        self.priorities = new;
    }

    /// Replace the inbox wholesale; the ≥1-entry invariant is restored
    pub fn replace_inbox(&mut self, new: Vec<String>) {
        debug!(len = new.len(), "Collections::replace_inbox: called");
        self.inbox = normalized_inbox(new);
    }

    /// Replace the schedule wholesale; emptied keys are deleted, never stored
    pub fn replace_schedule(&mut self, new: Schedule) {
        debug!(keys = new.len(), "Collections::replace_schedule: called");
        self.schedule = new;
        self.schedule.retain(|_, tasks| !tasks.is_empty());
    }

    // === Direct-edit operations (keyboard CRUD) ===

    /// Overwrite the text of one priority slot
    pub fn set_priority_text(&mut self, index: usize, text: impl Into<String>) {
        if let Some(slot) = self.priorities.get_mut(index) {
            *slot = text.into();
        }
    }

    /// Overwrite the text of one inbox entry
    ///
    /// Mid-edit the trailing-empty convention is deliberately not enforced;
    /// transfers restore it via [`Collections::new`].
    pub fn set_inbox_text(&mut self, index: usize, text: impl Into<String>) {
        if let Some(entry) = self.inbox.get_mut(index) {
            *entry = text.into();
        }
    }

    /// Insert an empty inbox entry at `index` (clamped to the list end)
    pub fn insert_inbox_entry(&mut self, index: usize) {
        let index = index.min(self.inbox.len());
        self.inbox.insert(index, String::new());
    }

    /// Append an empty inbox entry
    pub fn push_inbox_entry(&mut self) {
        self.inbox.push(String::new());
    }

    /// Delete an inbox entry; a fully emptied list becomes one empty entry
    pub fn remove_inbox_entry(&mut self, index: usize) {
        if index < self.inbox.len() {
            self.inbox.remove(index);
        }
        if self.inbox.is_empty() {
            self.inbox.push(String::new());
        }
    }

    /// Flip the completed flag of one schedule task; returns whether anything changed
    pub fn toggle_schedule_task(&mut self, key: SlotKey, index: usize) -> bool {
        match self.schedule.get_mut(&key).and_then(|tasks| tasks.get_mut(index)) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    /// Remove one schedule task, deleting the slot entry if it empties
    pub fn remove_schedule_task(&mut self, key: SlotKey, index: usize) -> bool {
        let Some(tasks) = self.schedule.get_mut(&key) else {
            return false;
        };
        if index >= tasks.len() {
            return false;
        }
        tasks.remove(index);
        if tasks.is_empty() {
            self.schedule.remove(&key);
        }
        true
    }

    /// Reset all three collections to their defaults
    pub fn clear_all(&mut self) {
        debug!("Collections::clear_all: called");
        *self = Self::default();
    }
}

/// Place text into the first empty inbox slot, or append when none is empty
pub fn receive_into_inbox(inbox: &mut Vec<String>, text: impl Into<String>) {
    let text = text.into();
    match inbox.iter_mut().find(|entry| entry.is_empty()) {
        Some(slot) => *slot = text,
        None => inbox.push(text),
    }
}

/// Restore the inbox invariants: at least one entry, and an empty entry
/// following the last non-empty one (the "next empty slot" for new input)
fn normalized_inbox(mut inbox: Vec<String>) -> Vec<String> {
    if inbox.is_empty() {
        inbox.push(String::new());
    }
    if inbox.last().is_some_and(|entry| !entry.is_empty()) {
        inbox.push(String::new());
    }
    inbox
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn slot(s: &str) -> SlotKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_default_shapes() {
        let c = Collections::default();
        assert_eq!(c.priorities(), &[String::new(), String::new(), String::new()]);
        assert_eq!(c.inbox(), &[String::new()]);
        assert!(c.schedule().is_empty());
    }

    #[test]
    fn test_replace_schedule_drops_empty_sequences() {
        let mut c = Collections::default();
        let mut schedule = Schedule::new();
        schedule.insert(slot("9-00"), vec![ScheduleTask::new("standup")]);
        schedule.insert(slot("10-30"), vec![]);
        c.replace_schedule(schedule);
        assert_eq!(c.schedule().len(), 1);
        assert!(c.schedule().contains_key(&slot("9-00")));
    }

    #[test]
    fn test_replace_inbox_restores_minimum() {
        let mut c = Collections::default();
        c.replace_inbox(vec![]);
        assert_eq!(c.inbox(), &[String::new()]);
    }

    #[test]
    fn test_replace_inbox_adds_trailing_empty() {
        let mut c = Collections::default();
        c.replace_inbox(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(c.inbox(), &["a".to_string(), "b".to_string(), String::new()]);
    }

    #[test]
    fn test_remove_last_inbox_entry_leaves_one_empty() {
        let mut c = Collections::default();
        c.set_inbox_text(0, "only");
        c.remove_inbox_entry(0);
        assert_eq!(c.inbox(), &[String::new()]);
    }

    #[test]
    fn test_remove_schedule_task_deletes_emptied_key() {
        let mut c = Collections::default();
        let mut schedule = Schedule::new();
        schedule.insert(slot("9-00"), vec![ScheduleTask::new("standup")]);
        c.replace_schedule(schedule);

        assert!(c.remove_schedule_task(slot("9-00"), 0));
        assert!(!c.schedule().contains_key(&slot("9-00")));
        assert!(!c.remove_schedule_task(slot("9-00"), 0));
    }

    #[test]
    fn test_toggle_schedule_task() {
        let mut c = Collections::default();
        let mut schedule = Schedule::new();
        schedule.insert(slot("9-00"), vec![ScheduleTask::new("standup")]);
        c.replace_schedule(schedule);

        assert!(c.toggle_schedule_task(slot("9-00"), 0));
        assert!(c.schedule()[&slot("9-00")][0].completed);
        assert!(c.toggle_schedule_task(slot("9-00"), 0));
        assert!(!c.schedule()[&slot("9-00")][0].completed);
        assert!(!c.toggle_schedule_task(slot("10-00"), 0));
    }

    #[test]
    fn test_receive_into_inbox_prefers_first_empty() {
        let mut inbox = vec!["a".to_string(), String::new(), "b".to_string()];
        receive_into_inbox(&mut inbox, "x");
        assert_eq!(inbox, vec!["a".to_string(), "x".to_string(), "b".to_string()]);

        let mut full = vec!["a".to_string()];
        receive_into_inbox(&mut full, "x");
        assert_eq!(full, vec!["a".to_string(), "x".to_string()]);
    }

    #[test]
    fn test_clear_all_resets_defaults() {
        let mut c = Collections::default();
        c.set_priority_text(0, "big rock");
        c.push_inbox_entry();
        let mut schedule = Schedule::new();
        schedule.insert(slot("9-00"), vec![ScheduleTask::new("standup")]);
        c.replace_schedule(schedule);

        c.clear_all();
        assert_eq!(c, Collections::default());
    }

    proptest! {
        /// The schedule never maps a key to an empty sequence, whatever
        /// interleaving of inserts and removes produced it.
        #[test]
        fn prop_schedule_never_holds_empty_sequence(ops in proptest::collection::vec((0u8..38, 0usize..4, proptest::bool::ANY), 0..60)) {
            let slots: Vec<SlotKey> = SlotKey::all().collect();
            let mut c = Collections::default();
            for (slot_idx, index, is_insert) in ops {
                let key = slots[slot_idx as usize];
                if is_insert {
                    let mut schedule = c.schedule().clone();
                    schedule.entry(key).or_default().push(ScheduleTask::new("t"));
                    c.replace_schedule(schedule);
                } else {
                    c.remove_schedule_task(key, index);
                }
                prop_assert!(c.schedule().values().all(|tasks| !tasks.is_empty()));
            }
        }

        /// The inbox always keeps at least one entry across edits and removals.
        #[test]
        fn prop_inbox_never_empties(ops in proptest::collection::vec((0usize..6, proptest::bool::ANY), 0..40)) {
            let mut c = Collections::default();
            for (index, is_remove) in ops {
                if is_remove {
                    c.remove_inbox_entry(index);
                } else {
                    c.insert_inbox_entry(index);
                }
                prop_assert!(!c.inbox().is_empty());
            }
        }
    }
}
