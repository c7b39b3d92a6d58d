//! Timebox - terminal daily planner with drag-and-drop task transfer
//!
//! A single-screen planner combining three panels: three prioritized task
//! slots, a free-form task inbox ("brain dump"), and a half-hour-resolution
//! daily schedule grid. Tasks move between panels by mouse drag-and-drop;
//! every change is mirrored to a local key-value store.
//!
//! # Core pieces
//!
//! - [`plan`] - the collections, slot keys, and the pure transfer rules
//!   engine that decides what a completed drop does
//! - [`persist`] - the bridge mirroring collections into a
//!   [`planstore::Store`] under fixed keys, load-before-save ordered
//! - [`tui`] - ratatui front end: drag session controller, drop target
//!   resolution from per-frame hit zones, keyboard editing
//!
//! # Invariants
//!
//! - The schedule never maps a slot key to an empty task list
//! - The inbox never drops below one entry
//! - A drag payload with blank text never starts a session
//! - Nothing is saved before the initial load attempt finishes

pub mod cli;
pub mod config;
pub mod persist;
pub mod plan;
pub mod tui;

// Re-export commonly used types
pub use config::Config;
pub use persist::{KEY_INBOX, KEY_PRIORITIES, KEY_SCHEDULE, PersistBridge};
pub use plan::{
    Collections, DragPayload, DragSource, DropTarget, Half, PRIORITY_SLOTS, Schedule, ScheduleTask, SlotKey,
    SlotKeyError, apply,
};
pub use tui::{App, AppState, DragSession, Event, EventHandler, HitMap, HitZone, InteractionMode, Panel, TuiRunner};
