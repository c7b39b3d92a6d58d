//! Terminal User Interface for Timebox
//!
//! A single-screen daily planner with three panels:
//! - Top priorities (three fixed slots)
//! - Brain dump (free-form task inbox)
//! - Half-hour schedule grid (5am to 11pm)
//!
//! Tasks move between panels by mouse drag-and-drop; text editing and the
//! remaining operations are keyboard driven.

mod app;
mod drag;
mod events;
mod hit;
mod runner;
pub mod state;
mod views;

pub use app::App;
pub use drag::{DragSession, ScrollDir};
pub use events::{Event, EventHandler};
pub use hit::{HitMap, HitZone};
pub use runner::TuiRunner;
pub use state::{AppState, InteractionMode, Panel};

use std::io::{self, Stdout};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use eyre::Result;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::persist::PersistBridge;

/// Terminal type alias
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
///
/// Mouse capture routes every pointer event to the app; while it is enabled
/// the terminal emulator's own text selection is out of the picture, so a
/// drag gesture can never be misread as selecting text.
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Run the planner TUI with the given persistence bridge
pub async fn run(bridge: PersistBridge) -> Result<()> {
    let terminal = init()?;

    // Guard so the terminal is restored even on early return or error
    struct TerminalGuard;
    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let _ = restore();
        }
    }
    let _guard = TerminalGuard;

    let mut runner = TuiRunner::new(terminal, bridge);
    runner.run().await
}
