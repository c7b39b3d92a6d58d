//! Transfer rules engine
//!
//! Pure state transitions for a finished drag gesture. Given the payload that
//! was picked up, the target it landed on, and a snapshot of the current
//! collections, `apply` computes the replacement collections - or `None` when
//! the pair has no defined effect (self-drop, inbox-to-inbox, cross-slot
//! task-to-task, and any other unrecognized combination).
//!
//! The engine never mutates in place: callers hand the result to
//! [`Collections`] replace operations as one atomic swap.

use tracing::debug;

use super::collections::{Collections, ScheduleTask, receive_into_inbox};
use super::slot::SlotKey;

/// Where a drag payload was picked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    /// Priority slot by index
    Priority(usize),
    /// Inbox entry by index
    Inbox(usize),
    /// Schedule task by slot and position within the slot
    Schedule { key: SlotKey, index: usize },
}

/// What the pointer was over when the gesture ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// A priority slot
    Priority(usize),
    /// Anywhere on the inbox panel
    Inbox,
    /// A schedule slot (the half-hour cell itself)
    ScheduleSlot(SlotKey),
    /// A specific task row inside a schedule slot
    ScheduleTask { key: SlotKey, index: usize },
}

/// The in-flight record describing one drag gesture
///
/// Lives only for the duration of the gesture; dropped on completion or
/// cancel, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub text: String,
    pub source: DragSource,
}

impl DragPayload {
    /// Build a payload from the current collections
    ///
    /// Returns `None` when the source does not exist or its text is blank;
    /// blank payloads never start a session.
    pub fn from_collections(collections: &Collections, source: DragSource) -> Option<Self> {
        let text = match source {
            DragSource::Priority(i) => collections.priorities().get(i)?.clone(),
            DragSource::Inbox(i) => collections.inbox().get(i)?.clone(),
            DragSource::Schedule { key, index } => {
                collections.schedule().get(&key)?.get(index)?.text.clone()
            }
        };
        if text.trim().is_empty() {
            return None;
        }
        Some(Self { text, source })
    }
}

/// Apply the transfer rules for one completed drop
///
/// `None` means the drop has no defined effect and the collections stand.
pub fn apply(payload: &DragPayload, target: DropTarget, current: &Collections) -> Option<Collections> {
    debug!(source = ?payload.source, ?target, "transfer::apply: called");
    match (payload.source, target) {
        // Two priority slots swap content; dropping a slot on itself stands.
        (DragSource::Priority(i), DropTarget::Priority(j)) => {
            if i == j {
                return None;
            }
            let mut priorities = current.priorities().clone();
            priorities.swap(i, j);
            Some(Collections::new(priorities, current.inbox().to_vec(), current.schedule().clone()))
        }

        // An inbox entry takes over a priority slot; displaced text goes back
        // to the inbox rather than being lost.
        (DragSource::Inbox(i), DropTarget::Priority(j)) => {
            if i >= current.inbox().len() || j >= current.priorities().len() {
                return None;
            }
            let mut priorities = current.priorities().clone();
            let displaced = std::mem::replace(&mut priorities[j], payload.text.clone());

            let mut inbox = current.inbox().to_vec();
            inbox.remove(i);
            if !displaced.is_empty() {
                receive_into_inbox(&mut inbox, displaced);
            }
            Some(Collections::new(priorities, inbox, current.schedule().clone()))
        }

        // A priority moves back to the inbox, clearing its slot.
        (DragSource::Priority(i), DropTarget::Inbox) => {
            if i >= current.priorities().len() {
                return None;
            }
            let mut priorities = current.priorities().clone();
            priorities[i].clear();

            let mut inbox = current.inbox().to_vec();
            receive_into_inbox(&mut inbox, payload.text.clone());
            Some(Collections::new(priorities, inbox, current.schedule().clone()))
        }

        // Inbox-to-inbox has no defined transfer effect.
        (DragSource::Inbox(_), DropTarget::Inbox) => None,

        // Any source can land on a schedule slot. A schedule-sourced drop is
        // a move (remove first); priorities and inbox drops copy their text.
        (source, DropTarget::ScheduleSlot(key)) => {
            let mut schedule = current.schedule().clone();
            if let DragSource::Schedule { key: from_key, index: from_index } = source {
                let tasks = schedule.get_mut(&from_key)?;
                if from_index >= tasks.len() {
                    return None;
                }
                tasks.remove(from_index);
                if tasks.is_empty() {
                    schedule.remove(&from_key);
                }
            }
            schedule.entry(key).or_default().push(ScheduleTask::new(payload.text.clone()));
            Some(Collections::new(current.priorities().clone(), current.inbox().to_vec(), schedule))
        }

        // Reorder within one slot: pull the task out and reinsert it at the
        // target position. Cross-slot task-to-task drops fall through below.
        (
            DragSource::Schedule { key: from_key, index: from_index },
            DropTarget::ScheduleTask { key: to_key, index: to_index },
        ) if from_key == to_key && from_index != to_index => {
            let mut schedule = current.schedule().clone();
            let tasks = schedule.get_mut(&from_key)?;
            if from_index >= tasks.len() {
                return None;
            }
            let task = tasks.remove(from_index);
            let to_index = to_index.min(tasks.len());
            tasks.insert(to_index, task);
            Some(Collections::new(current.priorities().clone(), current.inbox().to_vec(), schedule))
        }

        // Everything else is an unrecognized pair: no mutation, no error.
        _ => {
            debug!("transfer::apply: unrecognized pair, no-op");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::collections::Schedule;
    use proptest::prelude::*;

    fn slot(s: &str) -> SlotKey {
        s.parse().unwrap()
    }

    fn with_priorities(p: [&str; 3]) -> Collections {
        Collections::new(p.map(String::from), vec![String::new()], Schedule::new())
    }

    fn payload(collections: &Collections, source: DragSource) -> DragPayload {
        DragPayload::from_collections(collections, source).expect("payload")
    }

    #[test]
    fn test_priority_swap() {
        let c = with_priorities(["A", "B", ""]);
        let p = payload(&c, DragSource::Priority(0));
        let next = apply(&p, DropTarget::Priority(2), &c).unwrap();
        assert_eq!(next.priorities(), &["".to_string(), "B".to_string(), "A".to_string()]);
    }

    #[test]
    fn test_priority_self_drop_is_noop() {
        let c = with_priorities(["A", "", ""]);
        let p = payload(&c, DragSource::Priority(0));
        assert_eq!(apply(&p, DropTarget::Priority(0), &c), None);
    }

    #[test]
    fn test_inbox_to_empty_priority() {
        // spec scenario: priorities=["A","",""], inbox=["B",""],
        // drag inbox[0] onto priority[1]
        let c = Collections::new(
            ["A", "", ""].map(String::from),
            vec!["B".to_string(), String::new()],
            Schedule::new(),
        );
        let p = payload(&c, DragSource::Inbox(0));
        let next = apply(&p, DropTarget::Priority(1), &c).unwrap();
        assert_eq!(next.priorities(), &["A".to_string(), "B".to_string(), String::new()]);
        assert_eq!(next.inbox(), &[String::new()]);
    }

    #[test]
    fn test_inbox_to_occupied_priority_relocates_displaced() {
        let c = Collections::new(
            ["A", "", ""].map(String::from),
            vec!["B".to_string(), String::new()],
            Schedule::new(),
        );
        let p = payload(&c, DragSource::Inbox(0));
        let next = apply(&p, DropTarget::Priority(0), &c).unwrap();
        assert_eq!(next.priorities()[0], "B");
        // displaced "A" reappears in the inbox - no data loss
        assert!(next.inbox().contains(&"A".to_string()));
    }

    #[test]
    fn test_displaced_priority_appends_when_no_slot_empty() {
        // mid-edit inbox with no empty entries at all
        let mut c = Collections::new(
            ["A", "", ""].map(String::from),
            vec!["B".to_string(), "C".to_string()],
            Schedule::new(),
        );
        c.set_inbox_text(2, "D");

        let p = payload(&c, DragSource::Inbox(0));
        let next = apply(&p, DropTarget::Priority(0), &c).unwrap();
        assert_eq!(next.priorities()[0], "B");
        assert_eq!(
            next.inbox(),
            &["C".to_string(), "D".to_string(), "A".to_string(), String::new()]
        );
    }

    #[test]
    fn test_priority_to_inbox_clears_slot() {
        let c = with_priorities(["A", "", ""]);
        let p = payload(&c, DragSource::Priority(0));
        let next = apply(&p, DropTarget::Inbox, &c).unwrap();
        assert_eq!(next.priorities()[0], "");
        assert_eq!(next.inbox()[0], "A");
    }

    #[test]
    fn test_inbox_to_inbox_is_noop() {
        let c = Collections::new(
            Default::default(),
            vec!["B".to_string(), String::new()],
            Schedule::new(),
        );
        let p = payload(&c, DragSource::Inbox(0));
        assert_eq!(apply(&p, DropTarget::Inbox, &c), None);
    }

    #[test]
    fn test_inbox_to_schedule_slot_copies() {
        let c = Collections::new(
            Default::default(),
            vec!["B".to_string(), String::new()],
            Schedule::new(),
        );
        let p = payload(&c, DragSource::Inbox(0));
        let next = apply(&p, DropTarget::ScheduleSlot(slot("9-00")), &c).unwrap();
        assert_eq!(next.schedule()[&slot("9-00")], vec![ScheduleTask::new("B")]);
        // the inbox entry stays put - scheduling copies, it does not move
        assert_eq!(next.inbox()[0], "B");
    }

    #[test]
    fn test_schedule_to_schedule_slot_moves() {
        let mut schedule = Schedule::new();
        schedule.insert(slot("9-00"), vec![ScheduleTask::new("standup")]);
        let c = Collections::new(Default::default(), vec![String::new()], schedule);

        let p = payload(&c, DragSource::Schedule { key: slot("9-00"), index: 0 });
        let next = apply(&p, DropTarget::ScheduleSlot(slot("10-30")), &c).unwrap();
        // removal emptied "9-00", so the key is gone
        assert!(!next.schedule().contains_key(&slot("9-00")));
        assert_eq!(next.schedule()[&slot("10-30")][0].text, "standup");
    }

    #[test]
    fn test_move_resets_completed_flag() {
        let mut schedule = Schedule::new();
        schedule.insert(
            slot("9-00"),
            vec![ScheduleTask {
                text: "standup".to_string(),
                completed: true,
            }],
        );
        let c = Collections::new(Default::default(), vec![String::new()], schedule);

        let p = payload(&c, DragSource::Schedule { key: slot("9-00"), index: 0 });
        let next = apply(&p, DropTarget::ScheduleSlot(slot("10-00")), &c).unwrap();
        // the flag belongs to the placement, and a drop creates a new one
        assert!(!next.schedule()[&slot("10-00")][0].completed);
    }

    #[test]
    fn test_reorder_within_slot() {
        // spec scenario: slot "9-00" with 2 items, drag index 0 onto index 1
        let mut schedule = Schedule::new();
        schedule.insert(slot("9-00"), vec![ScheduleTask::new("a"), ScheduleTask::new("b")]);
        let c = Collections::new(Default::default(), vec![String::new()], schedule);

        let p = payload(&c, DragSource::Schedule { key: slot("9-00"), index: 0 });
        let next = apply(&p, DropTarget::ScheduleTask { key: slot("9-00"), index: 1 }, &c).unwrap();
        let tasks = &next.schedule()[&slot("9-00")];
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].text, "b");
        assert_eq!(tasks[1].text, "a");
    }

    #[test]
    fn test_reorder_same_index_is_noop() {
        let mut schedule = Schedule::new();
        schedule.insert(slot("9-00"), vec![ScheduleTask::new("a"), ScheduleTask::new("b")]);
        let c = Collections::new(Default::default(), vec![String::new()], schedule);

        let p = payload(&c, DragSource::Schedule { key: slot("9-00"), index: 1 });
        assert_eq!(apply(&p, DropTarget::ScheduleTask { key: slot("9-00"), index: 1 }, &c), None);
    }

    #[test]
    fn test_cross_slot_task_to_task_is_noop() {
        let mut schedule = Schedule::new();
        schedule.insert(slot("9-00"), vec![ScheduleTask::new("a")]);
        schedule.insert(slot("10-00"), vec![ScheduleTask::new("b")]);
        let c = Collections::new(Default::default(), vec![String::new()], schedule);

        let p = payload(&c, DragSource::Schedule { key: slot("9-00"), index: 0 });
        assert_eq!(apply(&p, DropTarget::ScheduleTask { key: slot("10-00"), index: 0 }, &c), None);
    }

    #[test]
    fn test_inbox_onto_schedule_task_is_noop() {
        let mut schedule = Schedule::new();
        schedule.insert(slot("9-00"), vec![ScheduleTask::new("a")]);
        let c = Collections::new(
            Default::default(),
            vec!["B".to_string(), String::new()],
            schedule,
        );

        let p = payload(&c, DragSource::Inbox(0));
        assert_eq!(apply(&p, DropTarget::ScheduleTask { key: slot("9-00"), index: 0 }, &c), None);
    }

    #[test]
    fn test_blank_payload_never_builds() {
        let c = Collections::default();
        assert_eq!(DragPayload::from_collections(&c, DragSource::Priority(0)), None);
        assert_eq!(DragPayload::from_collections(&c, DragSource::Inbox(0)), None);
        assert_eq!(
            DragPayload::from_collections(&c, DragSource::Schedule { key: slot("9-00"), index: 0 }),
            None
        );
    }

    #[test]
    fn test_stale_payload_against_changed_snapshot() {
        // the source row vanished between pickup and drop
        let c = Collections::new(
            Default::default(),
            vec!["B".to_string(), String::new()],
            Schedule::new(),
        );
        let p = payload(&c, DragSource::Inbox(0));
        let emptied = Collections::default();
        // inbox index 0 still exists (the empty entry), so the transfer runs
        // against the snapshot it was given - callers pass current state
        let next = apply(&p, DropTarget::Priority(0), &emptied).unwrap();
        assert_eq!(next.priorities()[0], "B");
    }

    proptest! {
        /// Swapping the same pair of priority slots twice restores the
        /// original list (swap is its own inverse) whenever i != j.
        #[test]
        fn prop_priority_swap_is_involution(
            texts in proptest::collection::vec("[a-z]{1,8}", 3),
            i in 0usize..3,
            j in 0usize..3,
        ) {
            prop_assume!(i != j);
            let priorities: [String; 3] = [texts[0].clone(), texts[1].clone(), texts[2].clone()];
            let c = Collections::new(priorities.clone(), vec![String::new()], Schedule::new());

            let p = payload(&c, DragSource::Priority(i));
            let once = apply(&p, DropTarget::Priority(j), &c).unwrap();
            let p2 = payload(&once, DragSource::Priority(i));
            let twice = apply(&p2, DropTarget::Priority(j), &once).unwrap();
            prop_assert_eq!(twice.priorities(), &priorities);
        }

        /// Reordering within a slot permutes the tasks, never duplicating or
        /// losing one.
        #[test]
        fn prop_reorder_preserves_multiset(
            texts in proptest::collection::vec("[a-z]{1,8}", 2..6),
            from in 0usize..6,
            to in 0usize..6,
        ) {
            prop_assume!(from < texts.len() && to < texts.len() && from != to);
            let key = slot("9-00");
            let tasks: Vec<ScheduleTask> = texts.iter().map(|t| ScheduleTask::new(t.as_str())).collect();
            let mut schedule = Schedule::new();
            schedule.insert(key, tasks.clone());
            let c = Collections::new(Default::default(), vec![String::new()], schedule);

            let p = payload(&c, DragSource::Schedule { key, index: from });
            let next = apply(&p, DropTarget::ScheduleTask { key, index: to }, &c).unwrap();

            let mut before: Vec<String> = tasks.iter().map(|t| t.text.clone()).collect();
            let mut after: Vec<String> = next.schedule()[&key].iter().map(|t| t.text.clone()).collect();
            before.sort();
            after.sort();
            prop_assert_eq!(before, after);
        }

        /// Moving an inbox entry onto any priority slot never loses the
        /// displaced text: everything non-empty beforehand is still present
        /// somewhere afterwards.
        #[test]
        fn prop_inbox_to_priority_loses_nothing(
            priorities in proptest::collection::vec("[a-z]{0,8}", 3),
            entry in "[a-z]{1,8}",
            j in 0usize..3,
        ) {
            let p_arr: [String; 3] = [priorities[0].clone(), priorities[1].clone(), priorities[2].clone()];
            let c = Collections::new(p_arr.clone(), vec![entry.clone(), String::new()], Schedule::new());
            let p = payload(&c, DragSource::Inbox(0));
            let next = apply(&p, DropTarget::Priority(j), &c).unwrap();

            let everywhere: Vec<&String> = next.priorities().iter().chain(next.inbox().iter()).collect();
            for text in p_arr.iter().chain(std::iter::once(&entry)).filter(|t| !t.is_empty()) {
                prop_assert!(everywhere.contains(&text), "lost '{}'", text);
            }
        }
    }
}
