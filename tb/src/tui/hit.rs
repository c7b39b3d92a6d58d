//! Drop target resolution
//!
//! The views module registers the screen rectangle of every interactive zone
//! while rendering a frame; the resulting map classifies a pointer cell at
//! gesture end. When zones nest, the most specific one wins: a task row over
//! its containing slot, a slot over its containing panel.

use ratatui::layout::{Position, Rect};
use tracing::trace;

use crate::plan::{DragSource, DropTarget, SlotKey};

/// One interactive region of the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    /// Grip cell of a priority row (drag pickup)
    PriorityGrip(usize),
    /// A whole priority row (drop + focus)
    PrioritySlot(usize),
    /// Grip cell of an inbox row (drag pickup)
    InboxGrip(usize),
    /// A whole inbox row (focus; drops resolve to the panel)
    InboxEntry(usize),
    /// The inbox panel background
    InboxPanel,
    /// Grip cell of a schedule task row (drag pickup)
    ScheduleGrip { key: SlotKey, index: usize },
    /// A task row inside a schedule slot
    ScheduleTaskRow { key: SlotKey, index: usize },
    /// All rows belonging to one schedule slot
    ScheduleSlotRow(SlotKey),
}

impl HitZone {
    /// Drop precedence: task-level over slot-level over panel-level.
    /// Zones that are not drop targets rank zero.
    fn drop_rank(self) -> u8 {
        match self {
            Self::ScheduleTaskRow { .. } => 3,
            Self::ScheduleSlotRow(_) | Self::PrioritySlot(_) => 2,
            Self::InboxEntry(_) | Self::InboxPanel => 1,
            Self::PriorityGrip(_) | Self::InboxGrip(_) | Self::ScheduleGrip { .. } => 0,
        }
    }

    fn as_drop_target(self) -> Option<DropTarget> {
        match self {
            Self::PrioritySlot(i) => Some(DropTarget::Priority(i)),
            Self::InboxEntry(_) | Self::InboxPanel => Some(DropTarget::Inbox),
            Self::ScheduleSlotRow(key) => Some(DropTarget::ScheduleSlot(key)),
            Self::ScheduleTaskRow { key, index } => Some(DropTarget::ScheduleTask { key, index }),
            Self::PriorityGrip(_) | Self::InboxGrip(_) | Self::ScheduleGrip { .. } => None,
        }
    }
}

/// Hit zones of the last rendered frame, in paint order
#[derive(Debug, Default)]
pub struct HitMap {
    entries: Vec<(Rect, HitZone)>,
}

impl HitMap {
    /// Forget the previous frame's zones
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Register a zone; later registrations are treated as topmost
    pub fn push(&mut self, rect: Rect, zone: HitZone) {
        if rect.width > 0 && rect.height > 0 {
            self.entries.push((rect, zone));
        }
    }

    fn zones_at(&self, x: u16, y: u16) -> impl Iterator<Item = HitZone> + '_ {
        let at = Position::new(x, y);
        self.entries
            .iter()
            .filter(move |(rect, _)| rect.contains(at))
            .map(|(_, zone)| zone)
            .copied()
    }

    /// Classify a release cell into a drop target, most specific zone first
    ///
    /// `None` means the drop is discarded: no mutation.
    pub fn drop_target_at(&self, x: u16, y: u16) -> Option<DropTarget> {
        let target = self
            .zones_at(x, y)
            .filter(|zone| zone.drop_rank() > 0)
            // max_by_key keeps the last of equal ranks: the topmost paint
            .max_by_key(|zone| zone.drop_rank())
            .and_then(HitZone::as_drop_target);
        trace!(x, y, ?target, "HitMap::drop_target_at");
        target
    }

    /// Drag pickup lookup: is this cell a grip?
    pub fn drag_source_at(&self, x: u16, y: u16) -> Option<DragSource> {
        self.zones_at(x, y).find_map(|zone| match zone {
            HitZone::PriorityGrip(i) => Some(DragSource::Priority(i)),
            HitZone::InboxGrip(i) => Some(DragSource::Inbox(i)),
            HitZone::ScheduleGrip { key, index } => Some(DragSource::Schedule { key, index }),
            _ => None,
        })
    }

    /// Topmost zone under a plain click, for focus moves
    pub fn zone_at(&self, x: u16, y: u16) -> Option<HitZone> {
        self.zones_at(x, y).last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(s: &str) -> SlotKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_map_resolves_nothing() {
        let map = HitMap::default();
        assert_eq!(map.drop_target_at(5, 5), None);
        assert_eq!(map.drag_source_at(5, 5), None);
    }

    #[test]
    fn test_task_over_slot_over_panel() {
        let mut map = HitMap::default();
        let key = slot("9-00");
        // nested rects sharing the cell (12, 6)
        map.push(Rect::new(0, 0, 40, 20), HitZone::InboxPanel);
        map.push(Rect::new(10, 5, 20, 4), HitZone::ScheduleSlotRow(key));
        map.push(Rect::new(10, 6, 20, 1), HitZone::ScheduleTaskRow { key, index: 0 });

        assert_eq!(
            map.drop_target_at(12, 6),
            Some(DropTarget::ScheduleTask { key, index: 0 })
        );
        // one row down: inside the slot but not the task row
        assert_eq!(map.drop_target_at(12, 7), Some(DropTarget::ScheduleSlot(key)));
        // outside the slot entirely: the panel
        assert_eq!(map.drop_target_at(2, 2), Some(DropTarget::Inbox));
        // outside everything
        assert_eq!(map.drop_target_at(50, 50), None);
    }

    #[test]
    fn test_priority_row_resolution() {
        let mut map = HitMap::default();
        map.push(Rect::new(0, 1, 30, 1), HitZone::PrioritySlot(1));
        map.push(Rect::new(0, 1, 2, 1), HitZone::PriorityGrip(1));

        assert_eq!(map.drop_target_at(10, 1), Some(DropTarget::Priority(1)));
        // the grip cell is still a priority drop (the grip itself ranks zero)
        assert_eq!(map.drop_target_at(0, 1), Some(DropTarget::Priority(1)));
        assert_eq!(map.drag_source_at(0, 1), Some(DragSource::Priority(1)));
        assert_eq!(map.drag_source_at(10, 1), None);
    }

    #[test]
    fn test_clear_forgets_zones() {
        let mut map = HitMap::default();
        map.push(Rect::new(0, 0, 10, 10), HitZone::InboxPanel);
        map.clear();
        assert_eq!(map.drop_target_at(5, 5), None);
    }

    #[test]
    fn test_zero_sized_rects_ignored() {
        let mut map = HitMap::default();
        map.push(Rect::new(0, 0, 0, 5), HitZone::InboxPanel);
        assert_eq!(map.drop_target_at(0, 0), None);
    }

    #[test]
    fn test_inbox_entry_resolves_to_panel_target() {
        let mut map = HitMap::default();
        map.push(Rect::new(0, 0, 30, 10), HitZone::InboxPanel);
        map.push(Rect::new(1, 2, 28, 1), HitZone::InboxEntry(1));
        assert_eq!(map.drop_target_at(5, 2), Some(DropTarget::Inbox));
        assert_eq!(map.zone_at(5, 2), Some(HitZone::InboxEntry(1)));
    }
}
