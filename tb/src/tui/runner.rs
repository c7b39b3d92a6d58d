//! TUI Runner - main loop that owns the terminal and the persistence bridge
//!
//! The TuiRunner is responsible for:
//! - Loading the collections before the first frame (never saving earlier)
//! - Rendering and dispatching events to App
//! - Translating mouse events into drag session transitions
//! - Stepping drag auto-scroll on each tick
//! - Persisting whichever collections an event changed

use std::time::Duration;

use eyre::Result;
use tracing::{debug, info, warn};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::views;
use crate::persist::PersistBridge;
use crate::plan::{self, DragPayload};

/// Tick rate: render/auto-scroll cadence while idle
const TICK_RATE: Duration = Duration::from_millis(100);

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    /// Application state
    app: App,
    /// Terminal handle
    terminal: Tui,
    /// Event handler
    event_handler: EventHandler,
    /// Persistence bridge (load-before-save enforced inside)
    bridge: PersistBridge,
}

impl TuiRunner {
    /// Create a runner; nothing is loaded or saved yet
    pub fn new(terminal: Tui, bridge: PersistBridge) -> Self {
        debug!("TuiRunner::new: called");
        Self {
            app: App::default(),
            terminal,
            event_handler: EventHandler::new(TICK_RATE),
            bridge,
        }
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        debug!("TuiRunner::run: called");

        // Initial load must complete for every key before any save can happen
        let collections = self.bridge.load_all();
        self.app = App::new(collections);

        info!("TuiRunner::run: entering main loop");
        loop {
            self.terminal.draw(|frame| views::render(self.app.state_mut(), frame))?;

            let event = self.event_handler.next().await?;
            let before = self.app.state().collections.clone();

            match event {
                Event::Tick => self.handle_tick(),
                Event::Key(key_event) => {
                    if self.app.handle_key(key_event) {
                        debug!("TuiRunner::run: force quit");
                        break;
                    }
                }
                Event::Mouse(mouse_event) => self.handle_mouse(mouse_event),
                Event::Resize(width, height) => {
                    debug!(width, height, "TuiRunner::run: terminal resized");
                }
            }

            if std::mem::take(&mut self.app.state_mut().pending_clear) {
                if let Err(e) = self.bridge.clear_all() {
                    warn!("Failed to clear persisted state: {:#}", e);
                }
            } else if let Err(e) = self.bridge.save_changed(&before, &self.app.state().collections) {
                // Persistence failures degrade to "unsaved", never crash the UI
                warn!("Failed to persist change: {:#}", e);
            }

            if self.app.state().should_quit {
                debug!("TuiRunner::run: should_quit is true, breaking");
                break;
            }
        }

        debug!("TuiRunner::run: exiting");
        Ok(())
    }

    /// Tick: step drag auto-scroll while a session is active
    fn handle_tick(&mut self) {
        let state = self.app.state_mut();
        if let Some(dir) = state.drag.auto_scroll(state.schedule_area) {
            state.scroll_schedule(dir.delta());
        }
    }

    /// Handle mouse event: drag lifecycle plus click-to-focus and wheel scroll
    fn handle_mouse(&mut self, mouse: crossterm::event::MouseEvent) {
        use crossterm::event::{MouseButton, MouseEventKind};

        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                debug!(x, y, "TuiRunner::handle_mouse: left button down");
                let state = self.app.state_mut();
                if let Some(source) = state.hit_map.drag_source_at(x, y) {
                    // Grip cell: pick the payload up. Blank rows build no
                    // payload, so no session starts for them.
                    if let Some(payload) = DragPayload::from_collections(&state.collections, source) {
                        state.drag.begin(payload, (x, y));
                    }
                } else if let Some(zone) = state.hit_map.zone_at(x, y) {
                    Self::focus_zone(state, zone);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.app.state_mut().drag.update((x, y));
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.finish_drag(x, y);
            }
            MouseEventKind::ScrollUp => self.app.state_mut().scroll_schedule(-1),
            MouseEventKind::ScrollDown => self.app.state_mut().scroll_schedule(1),
            _ => {}
        }
    }

    /// Button release: resolve the drop and apply the transfer rules
    fn finish_drag(&mut self, x: u16, y: u16) {
        let state = self.app.state_mut();
        let Some((payload, (drop_x, drop_y))) = state.drag.end((x, y)) else {
            return;
        };

        let Some(target) = state.hit_map.drop_target_at(drop_x, drop_y) else {
            debug!(x, y, "TuiRunner::finish_drag: no target resolved, drop discarded");
            return;
        };

        if let Some(next) = plan::apply(&payload, target, &state.collections) {
            info!(source = ?payload.source, ?target, "TuiRunner::finish_drag: transfer applied");
            // One atomic swap per collection, never partial edits
            state.collections.replace_priorities(next.priorities().clone());
            state.collections.replace_inbox(next.inbox().to_vec());
            state.collections.replace_schedule(next.schedule().clone());
            state.clamp_cursors();
        }
    }

    /// Plain click: move keyboard focus to the zone under the pointer
    fn focus_zone(state: &mut super::state::AppState, zone: super::hit::HitZone) {
        use super::hit::HitZone;
        use super::state::Panel;

        match zone {
            HitZone::PrioritySlot(i) | HitZone::PriorityGrip(i) => {
                state.focused_panel = Panel::Priorities;
                state.priority_cursor = i;
            }
            HitZone::InboxEntry(i) | HitZone::InboxGrip(i) => {
                state.focused_panel = Panel::Inbox;
                state.inbox_cursor = i;
            }
            HitZone::InboxPanel => {
                state.focused_panel = Panel::Inbox;
            }
            HitZone::ScheduleSlotRow(key) => {
                state.focused_panel = Panel::Schedule;
                state.slot_cursor = slot_position(key);
                state.task_cursor = 0;
            }
            HitZone::ScheduleTaskRow { key, index } | HitZone::ScheduleGrip { key, index } => {
                state.focused_panel = Panel::Schedule;
                state.slot_cursor = slot_position(key);
                state.task_cursor = index;
            }
        }
        state.clamp_cursors();
    }
}

/// Index of a slot key within the chronological day
fn slot_position(key: crate::plan::SlotKey) -> usize {
    crate::plan::SlotKey::all().position(|k| k == key).unwrap_or(0)
}
