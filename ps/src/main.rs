use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use planstore::Store;
use planstore::cli::{Cli, Command};
use planstore::config::Config;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let store_path = cli.store.unwrap_or(config.store_path);

    info!("planstore starting at {:?}", store_path);
    let store = Store::open(&store_path)?;

    match cli.command {
        Command::Get { key } => match store.get(&key)? {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("{} key '{}' not found", "✗".red(), key);
                std::process::exit(1);
            }
        },
        Command::Set { key, value } => {
            // Validate before storing so the store never holds unparseable text
            serde_json::from_str::<serde_json::Value>(&value).context("Value is not valid JSON")?;
            store.set(&key, &value)?;
            println!("{} {}", "✓".green(), key.cyan());
        }
        Command::Rm { key } => {
            store.remove(&key)?;
            println!("{} removed {}", "✓".green(), key.cyan());
        }
        Command::List => {
            for key in store.keys()? {
                println!("{}", key);
            }
        }
    }

    Ok(())
}
