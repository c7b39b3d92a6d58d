//! Planning domain: collections, slot keys, and the transfer rules engine

mod collections;
mod slot;
mod transfer;

pub use collections::{Collections, PRIORITY_SLOTS, Priorities, Schedule, ScheduleTask, receive_into_inbox};
pub use slot::{DAY_END_HOUR, DAY_START_HOUR, Half, SlotKey, SlotKeyError};
pub use transfer::{DragPayload, DragSource, DropTarget, apply};
