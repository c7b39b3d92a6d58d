//! Drag session controller
//!
//! A two-state machine (idle / dragging) owning the lifecycle of one drag
//! gesture. The session records the payload and the pointer cell; the views
//! module renders the floating proxy from it, and the runner feeds pointer
//! updates in and takes the payload back out on release.
//!
//! Every exit path (drop, failed resolve, cancel, implicit replacement by a
//! new `begin`) clears the session, so nothing drag-related can outlive the
//! gesture.

use ratatui::layout::Rect;
use tracing::debug;

use crate::plan::DragPayload;

/// Rows from the schedule grid's edge within which dragging auto-scrolls
pub const AUTOSCROLL_MARGIN: u16 = 2;

/// Direction the schedule grid should scroll during a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDir {
    Up,
    Down,
}

impl ScrollDir {
    /// Signed row delta for one auto-scroll step
    pub fn delta(self) -> isize {
        match self {
            Self::Up => -1,
            Self::Down => 1,
        }
    }
}

/// One in-flight drag gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDrag {
    pub payload: DragPayload,
    /// Pointer cell (column, row)
    pub pointer: (u16, u16),
}

/// The drag session state machine: idle, or dragging one payload
#[derive(Debug, Default)]
pub struct DragSession {
    active: Option<ActiveDrag>,
}

impl DragSession {
    /// Start a session at the given pointer cell
    ///
    /// Blank payload text is rejected silently (no session starts). If a
    /// session is already active it is cancelled first, without applying its
    /// transfer.
    pub fn begin(&mut self, payload: DragPayload, pointer: (u16, u16)) {
        if payload.text.trim().is_empty() {
            debug!("DragSession::begin: blank payload, ignoring");
            return;
        }
        if self.active.is_some() {
            debug!("DragSession::begin: replacing an active session");
        }
        debug!(source = ?payload.source, ?pointer, "DragSession::begin: session started");
        self.active = Some(ActiveDrag { payload, pointer });
    }

    /// Move the pointer; no-op while idle
    pub fn update(&mut self, pointer: (u16, u16)) {
        if let Some(drag) = &mut self.active {
            drag.pointer = pointer;
        }
    }

    /// End the session, yielding the payload and release cell
    ///
    /// The session is cleared unconditionally; the caller resolves the drop
    /// target and applies the transfer (or discards the payload).
    pub fn end(&mut self, pointer: (u16, u16)) -> Option<(DragPayload, (u16, u16))> {
        let drag = self.active.take()?;
        debug!(source = ?drag.payload.source, ?pointer, "DragSession::end: session finished");
        Some((drag.payload, pointer))
    }

    /// Abort the session without any transfer
    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            debug!("DragSession::cancel: session cancelled");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }

    /// Auto-scroll decision for the current pointer position
    ///
    /// While dragging within [`AUTOSCROLL_MARGIN`] rows of the grid's top or
    /// bottom edge, the grid scrolls one step per tick toward that edge.
    /// Idle sessions never scroll.
    pub fn auto_scroll(&self, grid: Rect) -> Option<ScrollDir> {
        let drag = self.active.as_ref()?;
        let (x, y) = drag.pointer;
        if x < grid.left() || x >= grid.right() || grid.height == 0 {
            return None;
        }
        if y >= grid.top() && y < grid.top() + AUTOSCROLL_MARGIN {
            Some(ScrollDir::Up)
        } else if y < grid.bottom() && y + AUTOSCROLL_MARGIN >= grid.bottom() {
            Some(ScrollDir::Down)
        } else {
            None
        }
    }
}
