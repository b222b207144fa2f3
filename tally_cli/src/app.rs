//! Interactive application state.
//!
//! Owns the calculator engine plus the state the engine does not track:
//! theme, scientific mode, history panel visibility and selection, and the
//! status line.

use crossterm::event::KeyEvent;
use tally_core::{Calculator, HistoryStore, KeyValueStore, Outcome, PersistentHistory};

use crate::keymap::{map_key, KeyCommand};
use crate::theme::{self, Theme};

pub struct App<S: KeyValueStore> {
    calc: Calculator<PersistentHistory<S>>,
    theme: Theme,
    scientific: bool,
    show_history: bool,
    /// Highlighted history row (0 is newest)
    selected: Option<usize>,
    /// Where the store lives, for the status bar
    store_label: String,
    status: String,
    should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(history: PersistentHistory<S>, theme: Theme, store_label: impl Into<String>) -> Self {
        App {
            calc: Calculator::with_history(history),
            theme,
            scientific: false,
            show_history: false,
            selected: None,
            store_label: store_label.into(),
            status: "F2 theme · F3 history · F4 scientific · Ctrl+Q quit".to_string(),
            should_quit: false,
        }
    }

    pub fn calculator(&self) -> &Calculator<PersistentHistory<S>> {
        &self.calc
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_scientific(&self) -> bool {
        self.scientific
    }

    pub fn is_history_visible(&self) -> bool {
        self.show_history
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn store_label(&self) -> &str {
        &self.store_label
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match map_key(key, self.scientific) {
            Some(command) => self.handle_command(command),
            None => tracing::trace!(?key, "unbound key"),
        }
    }

    pub fn handle_command(&mut self, command: KeyCommand) {
        tracing::debug!(?command, "key command");
        match command {
            KeyCommand::Calc(action) => {
                let outcome = self.calc.apply(action);
                self.after_calc(outcome);
            }
            KeyCommand::SelectPrevious => self.move_selection(-1),
            KeyCommand::SelectNext => self.move_selection(1),
            KeyCommand::RecallSelected => self.recall_selected(),
            KeyCommand::ToggleTheme => self.toggle_theme(),
            KeyCommand::ToggleHistory => {
                self.show_history = !self.show_history;
                if !self.show_history {
                    self.selected = None;
                }
            }
            KeyCommand::ToggleScientific => {
                self.scientific = !self.scientific;
                self.status = if self.scientific {
                    "Scientific mode".to_string()
                } else {
                    "Basic mode".to_string()
                };
            }
            KeyCommand::ClearHistory => self.clear_history(),
            KeyCommand::Quit => self.should_quit = true,
        }
    }

    fn after_calc(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Failed => {
                self.status = "Not a finite number. Esc or a digit to continue".to_string();
            }
            Outcome::Updated => self.status.clear(),
            Outcome::Ignored => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.calc.history().len();
        if len == 0 {
            self.selected = None;
            return;
        }
        self.show_history = true;
        self.selected = Some(match self.selected {
            None => 0,
            Some(i) => i.saturating_add_signed(delta).min(len - 1),
        });
    }

    fn recall_selected(&mut self) {
        let Some(index) = self.selected else {
            return;
        };
        if self.calc.recall_history(index).is_updated() {
            self.status = "Recalled from history".to_string();
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        match theme::save(self.calc.history_mut().store_mut(), self.theme) {
            Ok(()) => self.status = format!("Theme: {}", self.theme),
            Err(e) => {
                tracing::warn!(error = %e, "failed to save theme");
                self.status = format!("Theme: {} (not saved: {})", self.theme, e);
            }
        }
    }

    fn clear_history(&mut self) {
        self.selected = None;
        match self.calc.history_mut().clear() {
            Ok(()) => self.status = "History cleared".to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to clear saved history");
                self.status = format!("History cleared for this session only: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use tally_core::{MemoryStore, ERROR_TEXT, THEME_KEY};

    fn app() -> App<MemoryStore> {
        let history = PersistentHistory::open(MemoryStore::new()).unwrap();
        App::new(history, Theme::Dark, "memory")
    }

    fn type_keys(app: &mut App<MemoryStore>, keys: &str) {
        for c in keys.chars() {
            let code = match c {
                '\n' => KeyCode::Enter,
                '\u{8}' => KeyCode::Backspace,
                '\u{1b}' => KeyCode::Esc,
                c => KeyCode::Char(c),
            };
            app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
        }
    }

    #[test]
    fn test_typing_an_expression() {
        let mut app = app();
        type_keys(&mut app, "12+30\n");
        assert_eq!(app.calculator().display().current, "42");
        assert_eq!(app.calculator().history().len(), 1);
    }

    #[test]
    fn test_error_status_and_recovery() {
        let mut app = app();
        type_keys(&mut app, "1/0\n");
        assert_eq!(app.calculator().display().current, ERROR_TEXT);
        assert!(app.status().starts_with("Not a finite number"));

        type_keys(&mut app, "\u{1b}");
        assert_eq!(app.calculator().display().current, "0");
        assert!(app.status().is_empty());
    }

    #[test]
    fn test_scientific_mode_gates_function_keys() {
        let mut app = app();
        type_keys(&mut app, "9r");
        assert_eq!(app.calculator().display().current, "9");

        app.handle_command(KeyCommand::ToggleScientific);
        assert!(app.is_scientific());
        type_keys(&mut app, "r");
        assert_eq!(app.calculator().display().current, "3");
    }

    #[test]
    fn test_theme_toggle_is_saved() {
        let mut app = app();
        app.handle_command(KeyCommand::ToggleTheme);
        assert_eq!(app.theme(), Theme::Light);
        let saved = app.calculator().history().store().get(THEME_KEY).unwrap();
        assert_eq!(saved.as_deref(), Some("light"));
    }

    #[test]
    fn test_history_selection_and_recall() {
        let mut app = app();
        type_keys(&mut app, "2+3\n4*5\n");

        app.handle_command(KeyCommand::SelectNext);
        assert!(app.is_history_visible());
        assert_eq!(app.selected(), Some(0));

        app.handle_command(KeyCommand::SelectNext);
        app.handle_command(KeyCommand::SelectNext);
        assert_eq!(app.selected(), Some(1));

        app.handle_command(KeyCommand::RecallSelected);
        assert_eq!(app.calculator().display().current, "5");

        app.handle_command(KeyCommand::SelectPrevious);
        app.handle_command(KeyCommand::SelectPrevious);
        assert_eq!(app.selected(), Some(0));
    }

    #[test]
    fn test_selection_needs_history() {
        let mut app = app();
        app.handle_command(KeyCommand::SelectNext);
        assert_eq!(app.selected(), None);
        app.handle_command(KeyCommand::RecallSelected);
        assert_eq!(app.calculator().display().current, "0");
    }

    #[test]
    fn test_clear_history() {
        let mut app = app();
        type_keys(&mut app, "2+2\n");
        app.handle_command(KeyCommand::ClearHistory);
        assert!(app.calculator().history().is_empty());
        assert_eq!(app.status(), "History cleared");
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }
}
