//! TUI application - keyboard handling
//!
//! The App struct owns the AppState and handles all keyboard events.
//! It does not do any rendering - that's delegated to the views module -
//! and it never touches the store; the runner persists whatever changed
//! after each event.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::state::{AppState, ConfirmAction, ConfirmDialog, InteractionMode, Panel};
use crate::plan::Collections;

/// TUI application
#[derive(Debug, Default)]
pub struct App {
    /// Application state
    state: AppState,
}

impl App {
    /// Create an application instance around loaded collections
    pub fn new(collections: Collections) -> Self {
        Self {
            state: AppState::new(collections),
        }
    }

    /// Get reference to state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get mutable reference to state
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit immediately.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_key: called");
        self.state.clear_status();

        // A drag in flight always takes Esc first
        if key.code == KeyCode::Esc && self.state.drag.is_active() {
            debug!("App::handle_key: Esc cancels active drag");
            self.state.drag.cancel();
            return false;
        }

        match &self.state.interaction_mode {
            InteractionMode::Normal => self.handle_normal_key(key),
            InteractionMode::Edit => self.handle_edit_key(key),
            InteractionMode::Confirm(_) => self.handle_confirm_key(key),
            InteractionMode::Help => self.handle_help_key(key),
        }
    }

    /// Handle key in normal mode
    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_normal_key: called");
        match (key.code, key.modifiers) {
            // === Quit ===
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                debug!("App::handle_normal_key: Ctrl+C force quit");
                return true;
            }
            (KeyCode::Char('q'), _) => {
                // State is saved after every change, so quitting needs no guard
                self.state.should_quit = true;
            }

            // === Help ===
            (KeyCode::Char('?'), _) | (KeyCode::F(1), _) => {
                self.state.interaction_mode = InteractionMode::Help;
            }

            // === Panel / cursor navigation ===
            (KeyCode::Tab, _) => {
                self.state.focused_panel = self.state.focused_panel.next();
            }
            (KeyCode::BackTab, _) => {
                self.state.focused_panel = self.state.focused_panel.prev();
            }
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => {
                self.state.move_cursor(-1);
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => {
                self.state.move_cursor(1);
            }
            (KeyCode::Left, _) | (KeyCode::Char('h'), _) => {
                if self.state.focused_panel == Panel::Schedule {
                    self.state.move_task_cursor(-1);
                }
            }
            (KeyCode::Right, _) | (KeyCode::Char('l'), _) => {
                if self.state.focused_panel == Panel::Schedule {
                    self.state.move_task_cursor(1);
                }
            }

            // === Editing ===
            (KeyCode::Enter, _) | (KeyCode::Char('e'), _) | (KeyCode::Char('i'), _) => {
                if matches!(self.state.focused_panel, Panel::Priorities | Panel::Inbox) {
                    debug!("App::handle_normal_key: entering edit mode");
                    self.state.interaction_mode = InteractionMode::Edit;
                }
            }
            (KeyCode::Char('a'), _) => {
                if self.state.focused_panel == Panel::Inbox {
                    self.state.collections.push_inbox_entry();
                    self.state.inbox_cursor = self.state.collections.inbox().len() - 1;
                    self.state.interaction_mode = InteractionMode::Edit;
                }
            }
            (KeyCode::Char('d'), _) => self.delete_focused(),
            (KeyCode::Char(' '), _) => {
                if self.state.focused_panel == Panel::Schedule {
                    let key = self.state.focused_slot();
                    let index = self.state.task_cursor;
                    self.state.collections.toggle_schedule_task(key, index);
                }
            }

            // === Clear all (destructive, confirm first) ===
            (KeyCode::Char('C'), _) => {
                debug!("App::handle_normal_key: showing clear-all confirm dialog");
                self.state.interaction_mode = InteractionMode::Confirm(ConfirmDialog::clear_all());
            }

            _ => {}
        }
        false
    }

    /// Delete whatever holds the focus: an inbox entry or a schedule task
    fn delete_focused(&mut self) {
        match self.state.focused_panel {
            Panel::Inbox => {
                let index = self.state.inbox_cursor;
                self.state.collections.remove_inbox_entry(index);
                self.state.clamp_cursors();
            }
            Panel::Schedule => {
                let key = self.state.focused_slot();
                let index = self.state.task_cursor;
                self.state.collections.remove_schedule_task(key, index);
                self.state.clamp_cursors();
            }
            // Priorities are cleared by editing, not deleted
            Panel::Priorities => {
                let index = self.state.priority_cursor;
                self.state.collections.set_priority_text(index, "");
            }
        }
    }

    /// Handle key in edit mode (typing into the focused text field)
    fn handle_edit_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_edit_key: called");
        match key.code {
            KeyCode::Esc => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Enter => self.commit_and_advance(),
            KeyCode::Backspace => self.edit_text(|text| {
                text.pop();
            }),
            KeyCode::Char(c) => self.edit_text(|text| text.push(c)),
            _ => {}
        }
        false
    }

    /// Apply an edit closure to the focused field's text
    fn edit_text(&mut self, edit: impl FnOnce(&mut String)) {
        match self.state.focused_panel {
            Panel::Priorities => {
                let index = self.state.priority_cursor;
                let mut text = self.state.collections.priorities()[index].clone();
                edit(&mut text);
                self.state.collections.set_priority_text(index, text);
            }
            Panel::Inbox => {
                let index = self.state.inbox_cursor;
                let mut text = self.state.collections.inbox()[index].clone();
                edit(&mut text);
                self.state.collections.set_inbox_text(index, text);
            }
            Panel::Schedule => {}
        }
    }

    /// Enter in edit mode: move on the way the original planner did -
    /// priorities advance to the next slot, the inbox splices a fresh entry
    /// below and focuses it
    fn commit_and_advance(&mut self) {
        match self.state.focused_panel {
            Panel::Priorities => {
                if self.state.priority_cursor + 1 < crate::plan::PRIORITY_SLOTS {
                    self.state.priority_cursor += 1;
                } else {
                    self.state.interaction_mode = InteractionMode::Normal;
                }
            }
            Panel::Inbox => {
                let below = self.state.inbox_cursor + 1;
                self.state.collections.insert_inbox_entry(below);
                self.state.inbox_cursor = below;
            }
            Panel::Schedule => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
        }
    }

    /// Handle key in confirm mode
    fn handle_confirm_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_confirm_key: called");
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let InteractionMode::Confirm(dialog) = &self.state.interaction_mode {
                    match dialog.action {
                        ConfirmAction::ClearAll => {
                            debug!("App::handle_confirm_key: clear-all confirmed");
                            self.state.collections.clear_all();
                            self.state.pending_clear = true;
                            self.state.clamp_cursors();
                            self.state.status_message = Some("Cleared all planner data".to_string());
                        }
                    }
                }
                self.state.interaction_mode = InteractionMode::Normal;
            }
            _ => {}
        }
        false
    }

    /// Handle key in help mode
    fn handle_help_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_help_key: called");
        self.state.interaction_mode = InteractionMode::Normal;
        false
    }
}
