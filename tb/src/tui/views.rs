//! TUI views and rendering
//!
//! All rendering logic is contained here. The views module draws the UI from
//! AppState and, as it lays panels out, registers every interactive zone in
//! the frame's hit map - the same geometry the drop resolver will consult -
//! but it never mutates the collections.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tracing::trace;

use super::hit::HitZone;
use super::state::{AppState, InteractionMode, Panel};
use crate::plan::{PRIORITY_SLOTS, SlotKey};

/// Panel palette
mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const FOCUSED_BORDER: Color = Color::Rgb(0, 255, 127); // Spring green
    pub const SELECTED_BG: Color = Color::Rgb(40, 40, 40);
    pub const GRIP: Color = Color::DarkGray;
    pub const DONE: Color = Color::DarkGray;
    pub const SLOT_LABEL: Color = Color::Rgb(100, 149, 237); // Cornflower blue
    pub const PROXY_BG: Color = Color::Rgb(60, 60, 90);
    pub const STATUS: Color = Color::Rgb(255, 215, 0); // Gold
}

/// Drag handle glyph at the left edge of draggable rows
const GRIP: &str = "≡";

/// Main render function
pub fn render(state: &mut AppState, frame: &mut Frame) {
    trace!("render: called");
    state.hit_map.clear();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PRIORITY_SLOTS as u16 + 2), // 3 slots + borders
            Constraint::Min(0),
        ])
        .split(columns[0]);

    render_priorities(state, frame, left[0]);
    render_inbox(state, frame, left[1]);
    render_schedule(state, frame, columns[1]);
    render_footer(state, frame, chunks[2]);

    match &state.interaction_mode {
        InteractionMode::Confirm(dialog) => {
            let message = dialog.message.clone();
            render_confirm(frame, &message);
        }
        InteractionMode::Help => render_help(frame),
        _ => {}
    }

    render_drag_proxy(state, frame);
}

fn panel_block(state: &AppState, panel: Panel) -> Block<'static> {
    let mut block = Block::default().borders(Borders::ALL).title(panel.title());
    if state.focused_panel == panel {
        block = block.border_style(Style::default().fg(colors::FOCUSED_BORDER));
    }
    block
}

/// Is this row the keyboard focus, and are we typing into it?
fn editing(state: &AppState) -> bool {
    state.interaction_mode == InteractionMode::Edit
}

fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    let date = chrono::Local::now().format("%d/%m/%Y").to_string();
    let mut spans = vec![
        Span::styled("Timebox", Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD)),
        Span::raw("  Daily Planner  "),
        Span::styled(date, Style::default().add_modifier(Modifier::BOLD)),
    ];
    if let Some(status) = &state.status_message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(status.clone(), Style::default().fg(colors::STATUS)));
    }
    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_priorities(state: &mut AppState, frame: &mut Frame, area: Rect) {
    let block = panel_block(state, Panel::Priorities);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    for (i, text) in state.collections.priorities().clone().iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        let row = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
        let focused = state.focused_panel == Panel::Priorities && state.priority_cursor == i;

        let mut shown = text.clone();
        if focused && editing(state) {
            shown.push('▏');
        }
        let mut line = Line::from(vec![
            Span::styled(format!("{} ", i + 1), Style::default().fg(colors::GRIP)),
            Span::styled(GRIP, Style::default().fg(colors::GRIP)),
            Span::raw(" "),
            Span::raw(shown),
        ]);
        if focused {
            line = line.style(Style::default().bg(colors::SELECTED_BG));
        }
        frame.render_widget(Paragraph::new(line), row);

        state.hit_map.push(row, HitZone::PrioritySlot(i));
        state.hit_map.push(Rect::new(row.x + 2, row.y, 1, 1), HitZone::PriorityGrip(i));
    }
}

fn render_inbox(state: &mut AppState, frame: &mut Frame, area: Rect) {
    let block = panel_block(state, Panel::Inbox);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    state.hit_map.push(inner, HitZone::InboxPanel);

    for (i, text) in state.collections.inbox().to_vec().iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        let row = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
        let focused = state.focused_panel == Panel::Inbox && state.inbox_cursor == i;

        let mut shown = text.clone();
        if focused && editing(state) {
            shown.push('▏');
        }
        let mut line = Line::from(vec![
            Span::styled(GRIP, Style::default().fg(colors::GRIP)),
            Span::raw(" "),
            Span::raw(shown),
        ]);
        if focused {
            line = line.style(Style::default().bg(colors::SELECTED_BG));
        }
        frame.render_widget(Paragraph::new(line), row);

        state.hit_map.push(row, HitZone::InboxEntry(i));
        state.hit_map.push(Rect::new(row.x, row.y, 1, 1), HitZone::InboxGrip(i));
    }
}

/// One visual row of the schedule grid
struct GridRow {
    key: SlotKey,
    /// Task position within the slot; None renders an empty slot line
    task: Option<usize>,
    /// Slot label, shown on the slot's first row only
    label: Option<String>,
}

/// Flatten the schedule into drawable rows, one per task plus one per empty slot
fn grid_rows(state: &AppState) -> Vec<GridRow> {
    let mut rows = Vec::new();
    for key in SlotKey::all() {
        match state.collections.schedule().get(&key) {
            None => rows.push(GridRow {
                key,
                task: None,
                label: Some(key.label()),
            }),
            Some(tasks) => {
                for index in 0..tasks.len() {
                    rows.push(GridRow {
                        key,
                        task: Some(index),
                        label: (index == 0).then(|| key.label()),
                    });
                }
            }
        }
    }
    rows
}

fn render_schedule(state: &mut AppState, frame: &mut Frame, area: Rect) {
    let block = panel_block(state, Panel::Schedule);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // The drag controller needs the grid's geometry for edge auto-scroll
    state.schedule_area = inner;

    let rows = grid_rows(state);
    let visible = inner.height as usize;
    state.schedule_max_scroll = rows.len().saturating_sub(visible);
    state.schedule_scroll = state.schedule_scroll.min(state.schedule_max_scroll);

    // Slot-level zones span every visible row of the slot; collect while
    // drawing and register afterwards so task rows sit on top by rank
    let mut slot_spans: Vec<(SlotKey, u16, u16)> = Vec::new();

    let focused_slot = state.focused_slot();
    for (offset, row) in rows.iter().skip(state.schedule_scroll).take(visible).enumerate() {
        let y = inner.y + offset as u16;
        let row_rect = Rect::new(inner.x, y, inner.width, 1);

        match slot_spans.last_mut() {
            Some((key, _, end)) if *key == row.key => *end = y + 1,
            _ => slot_spans.push((row.key, y, y + 1)),
        }

        let label = row.label.clone().unwrap_or_default();
        let mut spans = vec![
            Span::styled(format!("{:>8} ", label), Style::default().fg(colors::SLOT_LABEL)),
            Span::raw("│ "),
        ];

        let slot_focused = state.focused_panel == Panel::Schedule && row.key == focused_slot;
        if let Some(index) = row.task {
            let task = &state.collections.schedule()[&row.key][index];
            let checkbox = if task.completed { "[x]" } else { "[ ]" };
            let mut style = Style::default();
            if task.completed {
                style = style.fg(colors::DONE).add_modifier(Modifier::CROSSED_OUT);
            }
            if slot_focused && state.task_cursor == index {
                style = style.add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(GRIP, Style::default().fg(colors::GRIP)));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!("{} {}", checkbox, task.text), style));

            // grip sits right after the gutter: label(9) + bar(2)
            state.hit_map.push(
                Rect::new(inner.x + 11, y, 1, 1),
                HitZone::ScheduleGrip { key: row.key, index },
            );
            state.hit_map.push(row_rect, HitZone::ScheduleTaskRow { key: row.key, index });
        }

        let mut line = Line::from(spans);
        if slot_focused {
            line = line.style(Style::default().bg(colors::SELECTED_BG));
        }
        frame.render_widget(Paragraph::new(line), row_rect);
    }

    for (key, start, end) in slot_spans {
        let rect = Rect::new(inner.x, start, inner.width, end - start);
        state.hit_map.push(rect, HitZone::ScheduleSlotRow(key));
    }
}

fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    let hints: &[(&str, &str)] = match state.interaction_mode {
        InteractionMode::Normal => &[
            ("Tab", "panel"),
            ("↑↓", "move"),
            ("e", "edit"),
            ("a", "add"),
            ("d", "delete"),
            ("Space", "done"),
            ("C", "clear all"),
            ("?", "help"),
            ("q", "quit"),
        ],
        InteractionMode::Edit => &[("Enter", "next"), ("Esc", "done")],
        InteractionMode::Confirm(_) => &[("y/Enter", "confirm"), ("n/Esc", "cancel")],
        InteractionMode::Help => &[("any key", "close")],
    };

    let mut spans = Vec::new();
    for (keybind, label) in hints {
        spans.push(Span::styled(
            format!(" {} ", keybind),
            Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!("{} ", label)));
    }
    if state.drag.is_active() {
        spans.push(Span::styled(
            " dragging: release to drop, Esc to cancel ",
            Style::default().fg(colors::STATUS),
        ));
    }
    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn render_confirm(frame: &mut Frame, message: &str) {
    let area = centered_rect(frame.area(), 50, 5);
    frame.render_widget(Clear, area);
    let dialog = Paragraph::new(vec![
        Line::raw(""),
        Line::from(Span::raw(message.to_string())).centered(),
        Line::from(vec![
            Span::styled("y", Style::default().fg(colors::KEYBIND)),
            Span::raw(" confirm   "),
            Span::styled("n", Style::default().fg(colors::KEYBIND)),
            Span::raw(" cancel"),
        ])
        .centered(),
    ])
    .block(Block::default().borders(Borders::ALL).title("Confirm"));
    frame.render_widget(dialog, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 56, 16);
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::raw("Navigation"),
        Line::raw("  Tab / Shift-Tab   cycle panels"),
        Line::raw("  ↑/↓ or k/j        move within a panel"),
        Line::raw("  ←/→ or h/l        pick a task within a slot"),
        Line::raw(""),
        Line::raw("Editing"),
        Line::raw("  e / i / Enter     edit the focused field"),
        Line::raw("  a                 add an inbox entry"),
        Line::raw("  d                 delete entry / task"),
        Line::raw("  Space             toggle task done"),
        Line::raw(""),
        Line::raw("Mouse"),
        Line::raw("  drag the ≡ grip to move tasks between panels"),
        Line::raw("  drop on a half-hour slot to schedule"),
    ];
    let help = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help"));
    frame.render_widget(help, area);
}

/// Floating proxy that follows the pointer during a drag session
fn render_drag_proxy(state: &AppState, frame: &mut Frame) {
    let Some(drag) = state.drag.active() else {
        return;
    };
    let screen = frame.area();
    let (x, y) = drag.pointer;
    let text = format!(" {} {} ", GRIP, drag.payload.text);
    let width = (text.chars().count() as u16).min(screen.width.saturating_sub(x + 1)).max(1);
    let x = (x + 1).min(screen.right().saturating_sub(width));
    let y = (y + 1).min(screen.bottom().saturating_sub(1));
    let area = Rect::new(x, y, width, 1);

    frame.render_widget(Clear, area);
    let proxy = Paragraph::new(text).style(
        Style::default()
            .bg(colors::PROXY_BG)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(proxy, area);
}

/// Fixed-size rect centered on the screen, clamped to it
fn centered_rect(screen: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(screen.width);
    let height = height.min(screen.height);
    Rect::new(
        screen.x + (screen.width - width) / 2,
        screen.y + (screen.height - height) / 2,
        width,
        height,
    )
}
