//! Timebox - terminal daily planner
//!
//! CLI entry point: launches the TUI by default, with subcommands for
//! clearing saved state and locating the data directory.

use std::fs;
use std::io::{self, Write};

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use planstore::Store;
use timebox::cli::{Cli, Command};
use timebox::config::Config;
use timebox::persist::PersistBridge;
use timebox::tui;

/// Logging goes to a file: stdout belongs to the TUI
fn setup_logging(cli_log_level: Option<&str>, config: &Config) -> Result<()> {
    let log_dir = config.log_dir();
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level_str = cli_log_level.or(config.log_level.as_deref());
    let level = match level_str.map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(log_dir.join("timebox.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

/// y/N prompt on stderr for destructive actions
fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{} [y/N] ", prompt);
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    setup_logging(cli.log_level.as_deref(), &config).context("Failed to setup logging")?;

    match cli.command {
        Some(Command::Clear { yes }) => {
            if !yes && !confirm("Clear all saved planner state? This cannot be undone.")? {
                eprintln!("Aborted.");
                return Ok(());
            }
            let store = Store::open(config.store_path()).context("Failed to open store")?;
            PersistBridge::new(store).clear_all()?;
            println!("Cleared all planner state.");
        }
        Some(Command::Path) => {
            println!("{}", config.data_dir.display());
        }
        None => {
            info!("Starting planner TUI");
            let store = Store::open(config.store_path()).context("Failed to open store")?;
            let bridge = PersistBridge::new(store);
            tui::run(bridge).await?;
        }
    }

    Ok(())
}
