//! Command line configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::theme::Theme;

/// Keypad calculator for the terminal.
///
/// Without a subcommand, starts the interactive keypad.
#[derive(Debug, Parser)]
#[command(name = "tally", version, about)]
pub struct Cli {
    /// Store file for history and preferences [default: <data dir>/tally/store.json]
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Keep history and preferences in memory only
    #[arg(long, global = true, conflicts_with = "store")]
    pub ephemeral: bool,

    /// Color theme (overrides the saved choice)
    #[arg(long, global = true, value_enum)]
    pub theme: Option<Theme>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Press keypad keys from the command line and print the display
    ///
    /// Example: tally eval 2 + 3 × 4 =
    Eval {
        /// Numbers, operators (+ - × ÷ ^), functions (sqrt, sin, fact, pi, ...) and =, C, del, neg
        #[arg(required = true, allow_hyphen_values = true)]
        tokens: Vec<String>,

        /// Print the full engine state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show saved computation history
    History {
        /// Delete all saved entries
        #[arg(long)]
        clear: bool,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Where the store lives, or `None` for an in-memory session.
    pub fn store_path(&self) -> Option<PathBuf> {
        if self.ephemeral {
            return None;
        }
        self.store.clone().or_else(default_store_path)
    }

    /// Interactive runs draw over the terminal, so logging must not use stderr.
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }
}

/// `<data dir>/tally/store.json`, if the platform has a data directory.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("tally").join("store.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_accepts_operator_tokens() {
        let cli = Cli::try_parse_from(["tally", "eval", "2", "-", "3", "="]).unwrap();
        match cli.command {
            Some(Command::Eval { tokens, json }) => {
                assert_eq!(tokens, vec!["2", "-", "3", "="]);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_ephemeral_has_no_store_path() {
        let cli = Cli::try_parse_from(["tally", "--ephemeral", "history"]).unwrap();
        assert_eq!(cli.store_path(), None);
        assert!(!cli.is_interactive());
    }

    #[test]
    fn test_explicit_store_path() {
        let cli = Cli::try_parse_from(["tally", "--store", "/tmp/t.json"]).unwrap();
        assert_eq!(cli.store_path(), Some(PathBuf::from("/tmp/t.json")));
        assert!(cli.is_interactive());
    }

    #[test]
    fn test_store_conflicts_with_ephemeral() {
        assert!(Cli::try_parse_from(["tally", "--store", "a.json", "--ephemeral"]).is_err());
    }

    #[test]
    fn test_theme_flag() {
        let cli = Cli::try_parse_from(["tally", "--theme", "light"]).unwrap();
        assert_eq!(cli.theme, Some(Theme::Light));
    }
}
