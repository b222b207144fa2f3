//! # Keypad Actions
//!
//! One [`Action`] per key a user can press. Front ends translate their own
//! input events into actions and hand them to [`Calculator::apply`].
//!
//! Two parsers are provided:
//! - [`Action::from_key`] maps keyboard key names (`"7"`, `"Enter"`,
//!   `"Backspace"`, `"Escape"`, `"*"`) the way a desktop keypad does.
//! - `FromStr` accepts script tokens (`"12.5"`, `"+"`, `"sqrt"`, `"="`,
//!   `"clear"`) for non-interactive use.
//!
//! [`Calculator::apply`]: crate::engine::Calculator::apply

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::operation::{Operation, ScientificFunction};

/// A single keypad press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "kebab-case")]
pub enum Action {
    /// A digit key, `'0'..='9'`
    Digit(char),
    /// The decimal point key
    Decimal,
    Operator(Operation),
    Equals,
    /// Backspace
    Delete,
    Clear,
    ToggleSign,
    Scientific(ScientificFunction),
}

impl Action {
    /// Map a keyboard key name to an action.
    ///
    /// Returns `None` for keys the keypad does not use.
    ///
    /// ```rust
    /// use tally_core::action::Action;
    /// use tally_core::operation::Operation;
    ///
    /// assert_eq!(Action::from_key("7"), Some(Action::Digit('7')));
    /// assert_eq!(Action::from_key("Enter"), Some(Action::Equals));
    /// assert_eq!(Action::from_key("-"), Some(Action::Operator(Operation::Subtract)));
    /// assert_eq!(Action::from_key("F1"), None);
    /// ```
    pub fn from_key(key: &str) -> Option<Action> {
        match key {
            "." => Some(Action::Decimal),
            "Enter" | "=" => Some(Action::Equals),
            "Backspace" => Some(Action::Delete),
            "Escape" => Some(Action::Clear),
            "+" => Some(Action::Operator(Operation::Add)),
            "-" => Some(Action::Operator(Operation::Subtract)),
            "*" => Some(Action::Operator(Operation::Multiply)),
            "/" => Some(Action::Operator(Operation::Divide)),
            _ => single_digit(key).map(Action::Digit),
        }
    }

    /// Parse a run of script tokens, expanding multi-digit numbers into one
    /// action per keypress.
    ///
    /// A number with more than one decimal point is `InvalidInput`; any other
    /// unrecognized token is `UnknownIdentifier`.
    ///
    /// ```rust
    /// use tally_core::action::Action;
    ///
    /// let actions = Action::parse_script(["12.5", "+", "3", "="]).unwrap();
    /// assert_eq!(actions.len(), 7);
    /// ```
    pub fn parse_script<I, T>(tokens: I) -> CalcResult<Vec<Action>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut actions = Vec::new();
        for token in tokens {
            let token = token.as_ref().trim();
            if is_numeric_run(token) && token.matches('.').count() > 1 {
                return Err(CalcError::invalid_input("number", token, "more than one decimal point"));
            }
            if is_number_literal(token) {
                actions.extend(token.chars().map(|c| {
                    if c == '.' {
                        Action::Decimal
                    } else {
                        Action::Digit(c)
                    }
                }));
            } else {
                actions.push(token.parse()?);
            }
        }
        Ok(actions)
    }
}

impl FromStr for Action {
    type Err = CalcError;

    /// Parse a single script token. Numbers longer than one key must go
    /// through [`Action::parse_script`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if let Some(digit) = single_digit(token) {
            return Ok(Action::Digit(digit));
        }
        match token.to_lowercase().as_str() {
            "." => return Ok(Action::Decimal),
            "=" | "equals" | "enter" => return Ok(Action::Equals),
            "del" | "delete" | "backspace" | "⌫" => return Ok(Action::Delete),
            "c" | "ac" | "clear" | "escape" | "esc" => return Ok(Action::Clear),
            "±" | "+/-" | "neg" | "negate" | "toggle-sign" => return Ok(Action::ToggleSign),
            _ => {}
        }
        if let Ok(op) = token.parse::<Operation>() {
            return Ok(Action::Operator(op));
        }
        if let Ok(func) = token.parse::<ScientificFunction>() {
            return Ok(Action::Scientific(func));
        }
        Err(CalcError::unknown_identifier("action", token))
    }
}

fn single_digit(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_digit() => Some(c),
        _ => None,
    }
}

/// Digits and decimal points, at least one digit.
fn is_numeric_run(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit()) && token.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// A numeric run with at most one decimal point.
fn is_number_literal(token: &str) -> bool {
    is_numeric_run(token) && token.matches('.').count() <= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_map() {
        for d in '0'..='9' {
            assert_eq!(Action::from_key(&d.to_string()), Some(Action::Digit(d)));
        }
        assert_eq!(Action::from_key("."), Some(Action::Decimal));
        assert_eq!(Action::from_key("="), Some(Action::Equals));
        assert_eq!(Action::from_key("Backspace"), Some(Action::Delete));
        assert_eq!(Action::from_key("Escape"), Some(Action::Clear));
        assert_eq!(Action::from_key("/"), Some(Action::Operator(Operation::Divide)));
        assert_eq!(Action::from_key("a"), None);
        assert_eq!(Action::from_key("12"), None);
    }

    #[test]
    fn test_token_parsing() {
        assert_eq!("5".parse::<Action>().unwrap(), Action::Digit('5'));
        assert_eq!("×".parse::<Action>().unwrap(), Action::Operator(Operation::Multiply));
        assert_eq!("=".parse::<Action>().unwrap(), Action::Equals);
        assert_eq!("C".parse::<Action>().unwrap(), Action::Clear);
        assert_eq!("±".parse::<Action>().unwrap(), Action::ToggleSign);
        assert_eq!(
            "fact".parse::<Action>().unwrap(),
            Action::Scientific(ScientificFunction::Factorial)
        );
        assert_eq!(
            "pi".parse::<Action>().unwrap(),
            Action::Scientific(ScientificFunction::Pi)
        );
    }

    #[test]
    fn test_operator_names_win_over_function_aliases() {
        // "pow" is both the power operator and the scientific power alias;
        // either way the engine starts a binary power operation.
        assert_eq!("pow".parse::<Action>().unwrap(), Action::Operator(Operation::Power));
    }

    #[test]
    fn test_unknown_token() {
        let err = "mod".parse::<Action>().unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_IDENTIFIER");
    }

    #[test]
    fn test_script_expands_numbers() {
        let actions = Action::parse_script(["12.5", "+", "3"]).unwrap();
        assert_eq!(
            actions,
            vec![
                Action::Digit('1'),
                Action::Digit('2'),
                Action::Decimal,
                Action::Digit('5'),
                Action::Operator(Operation::Add),
                Action::Digit('3'),
            ]
        );
    }

    #[test]
    fn test_script_stops_on_unknown_token() {
        assert!(Action::parse_script(["1", "+", "banana"]).is_err());
    }

    #[test]
    fn test_script_rejects_malformed_number() {
        let err = Action::parse_script(["1.2.3", "+", "4"]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(err, CalcError::invalid_input("number", "1.2.3", "more than one decimal point"));
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_string(&Action::Scientific(ScientificFunction::SquareRoot)).unwrap();
        assert_eq!(json, r#"{"action":"scientific","value":"square-root"}"#);
    }
}
