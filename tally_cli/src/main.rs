//! # Tally CLI
//!
//! Terminal keypad calculator built on `tally_core`.
//!
//! - `tally` starts the interactive keypad (Ratatui)
//! - `tally eval 2 + 3 =` presses keys from the command line
//! - `tally history` lists or clears saved computations
//!
//! History and the theme choice live in a [`FileStore`] under the platform
//! data directory unless `--store` or `--ephemeral` says otherwise.

mod app;
mod commands;
mod config;
mod keymap;
mod logging;
mod theme;
mod tui;
mod ui;

use anyhow::Context;
use clap::Parser;
use tally_core::{Calculator, FileStore, HistoryStore, KeyValueStore, MemoryStore, PersistentHistory};

use crate::app::App;
use crate::config::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref(), cli.is_interactive())?;

    let (store, store_label) = open_store(&cli)?;
    let mut history = PersistentHistory::open(store).context("failed to load saved history")?;
    tracing::info!(store = %store_label, entries = history.len(), "history loaded");

    match cli.command {
        None => {
            let theme = theme::resolve(history.store(), cli.theme);
            tui::run(App::new(history, theme, store_label))?;
        }
        Some(Command::Eval { tokens, json }) => {
            let mut calc = Calculator::with_history(history);
            println!("{}", commands::eval(&mut calc, &tokens, json)?);
        }
        Some(Command::History { clear, json }) => {
            println!("{}", commands::history(&mut history, clear, json)?);
        }
    }

    Ok(())
}

/// Open the configured store. Falls back to memory when there is no data directory.
fn open_store(cli: &Cli) -> anyhow::Result<(Box<dyn KeyValueStore>, String)> {
    match cli.store_path() {
        Some(path) => {
            let store = FileStore::open(&path)
                .with_context(|| format!("failed to open store {}", path.display()))?;
            Ok((Box::new(store), path.display().to_string()))
        }
        None => {
            if !cli.ephemeral {
                tracing::warn!("no data directory found; history will not be saved");
            }
            Ok((Box::new(MemoryStore::new()), "memory (not saved)".to_string()))
        }
    }
}
