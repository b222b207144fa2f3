//! Color themes and their persistence.
//!
//! The chosen theme is saved under [`THEME_KEY`] in the key-value store and
//! restored at startup. Resolution order: `--theme` flag, saved choice,
//! terminal background hint.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use tally_core::{CalcResult, KeyValueStore, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// Colors used by the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub error: Color,
    pub highlight: Color,
}

impl Theme {
    pub fn name(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_name(name: &str) -> Option<Theme> {
        match name.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: Color::Rgb(30, 30, 36),
                foreground: Color::Rgb(230, 230, 235),
                muted: Color::Rgb(140, 140, 150),
                accent: Color::Rgb(255, 159, 10),
                error: Color::Rgb(255, 99, 99),
                highlight: Color::Rgb(60, 60, 72),
            },
            Theme::Light => Palette {
                background: Color::Rgb(245, 245, 247),
                foreground: Color::Rgb(28, 28, 30),
                muted: Color::Rgb(110, 110, 115),
                accent: Color::Rgb(0, 110, 220),
                error: Color::Rgb(200, 30, 30),
                highlight: Color::Rgb(215, 215, 222),
            },
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Pick the startup theme.
pub fn resolve<S: KeyValueStore + ?Sized>(store: &S, flag: Option<Theme>) -> Theme {
    if let Some(theme) = flag {
        return theme;
    }
    match store.get(THEME_KEY) {
        Ok(Some(saved)) => match Theme::from_name(&saved) {
            Some(theme) => return theme,
            None => tracing::warn!(%saved, "ignoring unknown saved theme"),
        },
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "could not read saved theme"),
    }
    if terminal_prefers_dark(std::env::var("COLORFGBG").ok().as_deref()) {
        Theme::Dark
    } else {
        Theme::Light
    }
}

pub fn save<S: KeyValueStore + ?Sized>(store: &mut S, theme: Theme) -> CalcResult<()> {
    store.set(THEME_KEY, theme.name())
}

/// Read the `COLORFGBG` hint (`"fg;bg"`). Unknown means dark.
fn terminal_prefers_dark(colorfgbg: Option<&str>) -> bool {
    let background = colorfgbg
        .and_then(|value| value.rsplit(';').next())
        .and_then(|bg| bg.parse::<u8>().ok());
    match background {
        // ANSI 7 (light gray) and 9-15 are light backgrounds
        Some(7) | Some(9..=15) => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::MemoryStore;

    #[test]
    fn test_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn test_saved_theme_is_restored() {
        let mut store = MemoryStore::new();
        save(&mut store, Theme::Light).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert_eq!(resolve(&store, None), Theme::Light);
    }

    #[test]
    fn test_flag_overrides_saved_theme() {
        let mut store = MemoryStore::new();
        save(&mut store, Theme::Light).unwrap();
        assert_eq!(resolve(&store, Some(Theme::Dark)), Theme::Dark);
    }

    #[test]
    fn test_terminal_hint() {
        assert!(terminal_prefers_dark(Some("15;0")));
        assert!(!terminal_prefers_dark(Some("0;15")));
        assert!(!terminal_prefers_dark(Some("0;default;7")));
        assert!(terminal_prefers_dark(None));
        assert!(terminal_prefers_dark(Some("garbage")));
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    }
}
