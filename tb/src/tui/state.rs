//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here.
//! The collections live inside `AppState` and are only ever changed through
//! their replace/edit operations; views read, never write.

use ratatui::layout::Rect;
use tracing::debug;

use super::drag::DragSession;
use super::hit::HitMap;
use crate::plan::{Collections, PRIORITY_SLOTS, SlotKey};

/// The three panels, in Tab-cycling order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Priorities,
    Inbox,
    Schedule,
}

impl Panel {
    /// Get the next panel in the cycle
    pub fn next(self) -> Self {
        match self {
            Self::Priorities => Self::Inbox,
            Self::Inbox => Self::Schedule,
            Self::Schedule => Self::Priorities,
        }
    }

    /// Get the previous panel in the cycle
    pub fn prev(self) -> Self {
        match self {
            Self::Priorities => Self::Schedule,
            Self::Inbox => Self::Priorities,
            Self::Schedule => Self::Inbox,
        }
    }

    /// Panel title as rendered in its block border
    pub fn title(self) -> &'static str {
        match self {
            Self::Priorities => "Top Priorities",
            Self::Inbox => "Brain Dump",
            Self::Schedule => "Schedule",
        }
    }
}

/// Current interaction mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Navigation and single-key actions
    #[default]
    Normal,
    /// Typing into the focused priority slot or inbox entry
    Edit,
    /// Modal yes/no confirmation
    Confirm(ConfirmDialog),
    /// Keybinding help overlay
    Help,
}

/// A modal confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub message: String,
    pub action: ConfirmAction,
}

impl ConfirmDialog {
    pub fn new(action: ConfirmAction, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            action,
        }
    }

    /// Dialog guarding the destructive clear-all
    pub fn clear_all() -> Self {
        Self::new(ConfirmAction::ClearAll, "Clear all planner data? This cannot be undone.")
    }
}

/// What a confirmed dialog does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    ClearAll,
}

/// Application state
#[derive(Debug, Default)]
pub struct AppState {
    /// The three planning collections (single owner)
    pub collections: Collections,
    /// Current interaction mode
    pub interaction_mode: InteractionMode,
    /// Should the app quit
    pub should_quit: bool,
    /// Transient status line text
    pub status_message: Option<String>,

    // === Focus ===
    /// Panel holding the keyboard focus
    pub focused_panel: Panel,
    /// Focused priority slot (0..PRIORITY_SLOTS)
    pub priority_cursor: usize,
    /// Focused inbox entry
    pub inbox_cursor: usize,
    /// Focused schedule slot, as an index into the chronological slot list
    pub slot_cursor: usize,
    /// Focused task within the focused slot
    pub task_cursor: usize,

    // === Schedule viewport ===
    /// Scroll offset of the schedule grid, in rows
    pub schedule_scroll: usize,
    /// Max scroll offset (updated during render)
    pub schedule_max_scroll: usize,
    /// Screen area of the schedule grid (updated during render, feeds
    /// drag auto-scroll)
    pub schedule_area: Rect,

    // === Drag ===
    /// The drag gesture state machine
    pub drag: DragSession,
    /// Interactive zones of the last rendered frame
    pub hit_map: HitMap,
    /// Clear-all was confirmed; the runner must drop the persisted keys
    pub pending_clear: bool,
}

impl AppState {
    pub fn new(collections: Collections) -> Self {
        Self {
            collections,
            ..Self::default()
        }
    }

    /// Slot key under the schedule cursor
    pub fn focused_slot(&self) -> SlotKey {
        SlotKey::all()
            .nth(self.slot_cursor)
            .unwrap_or_else(|| SlotKey::all().next().expect("day has slots"))
    }

    /// Number of slots on the grid
    pub fn slot_count(&self) -> usize {
        SlotKey::all().count()
    }

    /// Move the vertical cursor within the focused panel
    pub fn move_cursor(&mut self, delta: isize) {
        match self.focused_panel {
            Panel::Priorities => {
                self.priority_cursor = step(self.priority_cursor, delta, PRIORITY_SLOTS);
            }
            Panel::Inbox => {
                self.inbox_cursor = step(self.inbox_cursor, delta, self.collections.inbox().len());
            }
            Panel::Schedule => {
                self.slot_cursor = step(self.slot_cursor, delta, self.slot_count());
                self.task_cursor = 0;
            }
        }
        debug!(panel = ?self.focused_panel, "AppState::move_cursor: moved");
    }

    /// Move the task cursor within the focused schedule slot
    pub fn move_task_cursor(&mut self, delta: isize) {
        let len = self
            .collections
            .schedule()
            .get(&self.focused_slot())
            .map_or(0, Vec::len);
        self.task_cursor = step(self.task_cursor, delta, len.max(1));
    }

    /// Keep cursors valid after the collections changed under them
    pub fn clamp_cursors(&mut self) {
        self.priority_cursor = self.priority_cursor.min(PRIORITY_SLOTS - 1);
        self.inbox_cursor = self
            .inbox_cursor
            .min(self.collections.inbox().len().saturating_sub(1));
        self.slot_cursor = self.slot_cursor.min(self.slot_count() - 1);
        let tasks = self
            .collections
            .schedule()
            .get(&self.focused_slot())
            .map_or(0, Vec::len);
        self.task_cursor = self.task_cursor.min(tasks.saturating_sub(1));
    }

    /// Scroll the schedule grid, clamped to the rendered content
    pub fn scroll_schedule(&mut self, delta: isize) {
        let next = self.schedule_scroll.saturating_add_signed(delta);
        self.schedule_scroll = next.min(self.schedule_max_scroll);
    }

    /// Clear any transient status text
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

/// Saturating cursor step within `0..len`
fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current
        .saturating_add_signed(delta)
        .min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_cycle_roundtrip() {
        for panel in [Panel::Priorities, Panel::Inbox, Panel::Schedule] {
            assert_eq!(panel.next().prev(), panel);
            assert_eq!(panel.prev().next(), panel);
        }
    }

    #[test]
    fn test_cursor_clamps_at_edges() {
        let mut state = AppState::default();
        state.move_cursor(-1);
        assert_eq!(state.priority_cursor, 0);
        state.move_cursor(10);
        assert_eq!(state.priority_cursor, 2);
    }

    #[test]
    fn test_focused_slot_follows_cursor() {
        let mut state = AppState::default();
        state.focused_panel = Panel::Schedule;
        assert_eq!(state.focused_slot().to_string(), "5-00");
        state.move_cursor(1);
        assert_eq!(state.focused_slot().to_string(), "5-30");
        state.move_cursor(100);
        assert_eq!(state.focused_slot().to_string(), "23-30");
    }

    #[test]
    fn test_scroll_respects_max() {
        let mut state = AppState {
            schedule_max_scroll: 5,
            ..AppState::default()
        };
        state.scroll_schedule(3);
        assert_eq!(state.schedule_scroll, 3);
        state.scroll_schedule(10);
        assert_eq!(state.schedule_scroll, 5);
        state.scroll_schedule(-10);
        assert_eq!(state.schedule_scroll, 0);
    }

    #[test]
    fn test_clamp_cursors_after_shrink() {
        let mut state = AppState::default();
        state.collections.push_inbox_entry();
        state.collections.push_inbox_entry();
        state.inbox_cursor = 2;
        state.collections.remove_inbox_entry(2);
        state.collections.remove_inbox_entry(1);
        state.clamp_cursors();
        assert_eq!(state.inbox_cursor, 0);
    }
}
