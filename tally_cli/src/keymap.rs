//! Terminal key bindings.
//!
//! Plain keypad keys go through [`Action::from_key`] so the terminal behaves
//! like any desktop calculator (digits, `.`, `+ - * /`, Enter, Backspace,
//! Escape). Letters add the keys a keyboard lacks: sign toggle and, in
//! scientific mode, the function row.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tally_core::{Action, Operation, ScientificFunction};

/// Everything a key press can ask the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Calc(Action),
    SelectPrevious,
    SelectNext,
    RecallSelected,
    ToggleTheme,
    ToggleHistory,
    ToggleScientific,
    ClearHistory,
    Quit,
}

/// Scientific keys: (key, function, legend label)
pub const SCIENTIFIC_KEYS: [(char, ScientificFunction, &str); 11] = [
    ('w', ScientificFunction::Square, "x²"),
    ('r', ScientificFunction::SquareRoot, "√x"),
    ('i', ScientificFunction::Reciprocal, "1/x"),
    ('s', ScientificFunction::Sin, "sin"),
    ('c', ScientificFunction::Cos, "cos"),
    ('t', ScientificFunction::Tan, "tan"),
    ('l', ScientificFunction::Log10, "log"),
    ('L', ScientificFunction::Ln, "ln"),
    ('!', ScientificFunction::Factorial, "n!"),
    ('p', ScientificFunction::Pi, "π"),
    ('e', ScientificFunction::E, "e"),
];

/// Key that toggles the sign of the current operand
pub const TOGGLE_SIGN_KEY: char = 'n';

pub fn map_key(key: KeyEvent, scientific: bool) -> Option<KeyCommand> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(KeyCommand::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::F(2) => return Some(KeyCommand::ToggleTheme),
        KeyCode::F(3) => return Some(KeyCommand::ToggleHistory),
        KeyCode::F(4) => return Some(KeyCommand::ToggleScientific),
        KeyCode::F(5) => return Some(KeyCommand::ClearHistory),
        KeyCode::Up => return Some(KeyCommand::SelectPrevious),
        KeyCode::Down => return Some(KeyCommand::SelectNext),
        KeyCode::Tab => return Some(KeyCommand::RecallSelected),
        KeyCode::Char(TOGGLE_SIGN_KEY) => return Some(KeyCommand::Calc(Action::ToggleSign)),
        KeyCode::Char('^') => return Some(KeyCommand::Calc(Action::Operator(Operation::Power))),
        KeyCode::Char(c) if scientific => {
            if let Some((_, func, _)) = SCIENTIFIC_KEYS.iter().find(|(k, _, _)| *k == c) {
                return Some(KeyCommand::Calc(Action::Scientific(*func)));
            }
        }
        _ => {}
    }

    key_name(key.code)
        .and_then(|name| Action::from_key(&name))
        .map(KeyCommand::Calc)
}

/// Browser-style key name for the keys the keypad understands.
fn key_name(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Enter => Some("Enter".to_string()),
        KeyCode::Backspace => Some("Backspace".to_string()),
        KeyCode::Esc => Some("Escape".to_string()),
        KeyCode::Char(c) => Some(c.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_keypad_keys() {
        assert_eq!(map_key(press(KeyCode::Char('7')), false), Some(KeyCommand::Calc(Action::Digit('7'))));
        assert_eq!(map_key(press(KeyCode::Enter), false), Some(KeyCommand::Calc(Action::Equals)));
        assert_eq!(map_key(press(KeyCode::Backspace), false), Some(KeyCommand::Calc(Action::Delete)));
        assert_eq!(map_key(press(KeyCode::Esc), false), Some(KeyCommand::Calc(Action::Clear)));
        assert_eq!(
            map_key(press(KeyCode::Char('*')), false),
            Some(KeyCommand::Calc(Action::Operator(Operation::Multiply)))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('^')), false),
            Some(KeyCommand::Calc(Action::Operator(Operation::Power)))
        );
    }

    #[test]
    fn test_scientific_keys_need_scientific_mode() {
        assert_eq!(map_key(press(KeyCode::Char('s')), false), None);
        assert_eq!(
            map_key(press(KeyCode::Char('s')), true),
            Some(KeyCommand::Calc(Action::Scientific(ScientificFunction::Sin)))
        );
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('L'), KeyModifiers::SHIFT), true),
            Some(KeyCommand::Calc(Action::Scientific(ScientificFunction::Ln)))
        );
    }

    #[test]
    fn test_digits_still_work_in_scientific_mode() {
        assert_eq!(map_key(press(KeyCode::Char('3')), true), Some(KeyCommand::Calc(Action::Digit('3'))));
    }

    #[test]
    fn test_app_keys() {
        assert_eq!(map_key(press(KeyCode::F(2)), false), Some(KeyCommand::ToggleTheme));
        assert_eq!(map_key(press(KeyCode::Tab), false), Some(KeyCommand::RecallSelected));
        assert_eq!(map_key(press(KeyCode::Char('n')), false), Some(KeyCommand::Calc(Action::ToggleSign)));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), true),
            Some(KeyCommand::Quit)
        );
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(map_key(press(KeyCode::Char('z')), true), None);
        assert_eq!(map_key(press(KeyCode::Home), false), None);
    }
}
