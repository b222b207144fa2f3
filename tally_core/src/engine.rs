//! # Calculator Engine
//!
//! The keypad state machine: an operand being typed, an optional pending
//! binary operation with its left operand, and a flag saying whether the next
//! digit starts a new number.
//!
//! Operations chain strictly left to right with no precedence: keying
//! `2 + 3 × 4 =` evaluates `(2 + 3) × 4`.
//!
//! ## Errors
//!
//! Nothing here returns `Result`. Requests that make no sense in the current
//! state (a second decimal point, backspace right after a result, an operator
//! with nothing to operate on) are ignored and report [`Outcome::Ignored`].
//! Arithmetic that produces infinity or NaN switches the display to the
//! [`ERROR_TEXT`] sentinel and reports [`Outcome::Failed`]; only a clear
//! (explicit, or implied by the next digit or scientific key) leaves it.
//!
//! ## Example
//!
//! ```rust
//! use tally_core::engine::Calculator;
//! use tally_core::history::HistoryStore;
//! use tally_core::operation::Operation;
//!
//! let mut calc = Calculator::new();
//! calc.append_number('2');
//! calc.choose_operation(Operation::Add);
//! calc.append_number('3');
//! calc.choose_operation(Operation::Multiply);
//! calc.append_number('4');
//! calc.compute();
//!
//! assert_eq!(calc.display().current, "20");
//! assert_eq!(calc.history().load_all()[0].expression, "5 × 4 =");
//! ```

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::format::format_number;
use crate::history::{History, HistoryEntry, HistoryStore};
use crate::operation::{Operation, ScientificFunction};

/// Text shown in place of the operand while in the error state
pub const ERROR_TEXT: &str = "Error";

/// Operand shown after a clear
const ZERO: &str = "0";

/// Raw calculator state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorState {
    /// Number being typed or just computed, or [`ERROR_TEXT`]
    pub current: String,
    /// Left operand of the pending operation, or empty
    pub previous: String,
    /// Pending binary operation
    pub operation: Option<Operation>,
    /// Next digit replaces `current` instead of extending it
    pub ready_to_reset: bool,
}

impl CalculatorState {
    pub fn is_error(&self) -> bool {
        self.current == ERROR_TEXT
    }
}

impl Default for CalculatorState {
    fn default() -> Self {
        CalculatorState {
            current: ZERO.to_string(),
            previous: String::new(),
            operation: None,
            ready_to_reset: false,
        }
    }
}

/// What the front end should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    /// Current operand or [`ERROR_TEXT`]
    pub current: String,
    /// `"<previous> <symbol>"` while an operation is pending, otherwise empty
    pub previous: String,
}

/// Result of a single engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// State changed
    Updated,
    /// Request did not apply in the current state; nothing changed
    Ignored,
    /// Arithmetic failed; the engine is now in the error state
    Failed,
}

impl Outcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, Outcome::Updated)
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Outcome::Ignored)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed)
    }
}

/// Keypad calculator.
///
/// Generic over where completed computations are recorded; [`Calculator::new`]
/// keeps them in memory.
#[derive(Debug, Clone)]
pub struct Calculator<H: HistoryStore = History> {
    state: CalculatorState,
    history: H,
}

impl Calculator<History> {
    /// A cleared calculator with in-memory history.
    pub fn new() -> Self {
        Calculator::with_history(History::new())
    }
}

impl Default for Calculator<History> {
    fn default() -> Self {
        Calculator::new()
    }
}

impl<H: HistoryStore> Calculator<H> {
    /// A cleared calculator recording into `history`.
    pub fn with_history(history: H) -> Self {
        Calculator {
            state: CalculatorState::default(),
            history,
        }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Mutable access for clearing history from the UI.
    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub fn into_history(self) -> H {
        self.history
    }

    pub fn is_error(&self) -> bool {
        self.state.is_error()
    }

    /// Project the state into the two display lines.
    pub fn display(&self) -> Display {
        let previous = match self.state.operation {
            Some(op) => format!("{} {}", self.state.previous, op.symbol()),
            None => String::new(),
        };
        Display {
            current: self.state.current.clone(),
            previous,
        }
    }

    /// Dispatch a keypad action.
    pub fn apply(&mut self, action: Action) -> Outcome {
        match action {
            Action::Digit(d) => self.append_number(d),
            Action::Decimal => self.append_number('.'),
            Action::Operator(op) => self.choose_operation(op),
            Action::Equals => self.compute(),
            Action::Delete => self.delete(),
            Action::Clear => self.clear(),
            Action::ToggleSign => self.toggle_sign(),
            Action::Scientific(func) => self.apply_scientific(func),
        }
    }

    /// Reset to `0` with nothing pending.
    pub fn clear(&mut self) -> Outcome {
        self.state = CalculatorState::default();
        Outcome::Updated
    }

    /// Backspace.
    pub fn delete(&mut self) -> Outcome {
        if self.state.is_error() {
            return self.clear();
        }
        // A freshly computed result is not edited.
        if self.state.ready_to_reset {
            return Outcome::Ignored;
        }

        let current = &mut self.state.current;
        current.pop();
        if current.is_empty() || *current == "-" {
            *current = ZERO.to_string();
        }
        Outcome::Updated
    }

    /// Flip the sign of the current operand.
    pub fn toggle_sign(&mut self) -> Outcome {
        let current = &self.state.current;
        if current.is_empty() || current == ZERO || self.state.is_error() {
            return Outcome::Ignored;
        }

        // The sign flip turns a result back into an editable number.
        self.state.ready_to_reset = false;

        let current = &mut self.state.current;
        if current.starts_with('-') {
            current.remove(0);
        } else {
            current.insert(0, '-');
        }
        Outcome::Updated
    }

    /// Type a digit or the decimal point.
    pub fn append_number(&mut self, token: char) -> Outcome {
        if !(token.is_ascii_digit() || token == '.') {
            return Outcome::Ignored;
        }
        if self.state.is_error() {
            self.clear();
        }
        if token == '.' && self.state.current.contains('.') {
            return Outcome::Ignored;
        }

        let state = &mut self.state;
        if state.ready_to_reset {
            state.current = token.to_string();
            state.ready_to_reset = false;
        } else if state.current == ZERO && token != '.' {
            state.current = token.to_string();
        } else {
            state.current.push(token);
        }
        Outcome::Updated
    }

    /// Press a binary operator key.
    ///
    /// With an operation already pending and a right operand typed, the
    /// pending operation is resolved first. Pressing operators back to back
    /// only swaps the pending one.
    pub fn choose_operation(&mut self, op: Operation) -> Outcome {
        if self.state.is_error() {
            return Outcome::Ignored;
        }
        if self.state.current.is_empty() {
            if self.state.previous.is_empty() {
                return Outcome::Ignored;
            }
            self.state.operation = Some(op);
            return Outcome::Updated;
        }

        if !self.state.previous.is_empty() && self.compute().is_failed() {
            return Outcome::Failed;
        }

        let state = &mut self.state;
        state.operation = Some(op);
        state.previous = std::mem::take(&mut state.current);
        state.ready_to_reset = false;
        Outcome::Updated
    }

    /// Resolve the pending operation (the `=` key).
    pub fn compute(&mut self) -> Outcome {
        let (Some(lhs), Some(rhs)) = (parse_operand(&self.state.previous), parse_operand(&self.state.current)) else {
            return Outcome::Ignored;
        };
        let Some(op) = self.state.operation else {
            return Outcome::Ignored;
        };

        let value = op.apply(lhs, rhs);
        if !value.is_finite() {
            tracing::debug!(%lhs, %rhs, op = op.name(), "computation produced a non-finite value");
            return self.fail();
        }

        let expression = format!("{} {} {} =", self.state.previous, op.symbol(), self.state.current);
        let result = format_number(value);
        self.record(expression, &result);

        let state = &mut self.state;
        state.current = result;
        state.previous.clear();
        state.operation = None;
        state.ready_to_reset = true;
        Outcome::Updated
    }

    /// Press a scientific key.
    ///
    /// Ignored unless the current operand is a number (constants excepted).
    /// Unary functions replace the current operand with their result and
    /// leave any pending binary operation in place. `Power` starts a binary
    /// power operation instead.
    pub fn apply_scientific(&mut self, func: ScientificFunction) -> Outcome {
        if self.state.is_error() {
            self.clear();
        }

        let operand = parse_operand(&self.state.current);
        if operand.is_none() && !func.is_constant() {
            return Outcome::Ignored;
        }
        if func == ScientificFunction::Power {
            return self.choose_operation(Operation::Power);
        }

        let value = func.evaluate(operand.unwrap_or(f64::NAN));

        if !value.is_finite() {
            tracing::debug!(function = func.name(), operand = %self.state.current, "function produced a non-finite value");
            return self.fail();
        }

        let expression = if func.is_constant() {
            format!("{} =", func.label())
        } else {
            format!("{}({}) =", func.label(), self.state.current)
        };
        let result = format_number(value);
        self.record(expression, &result);

        self.state.current = result;
        self.state.ready_to_reset = true;
        Outcome::Updated
    }

    /// Load a previous result as if it had just been computed.
    ///
    /// The error sentinel and anything that is not a plain number are
    /// ignored.
    pub fn set_from_history(&mut self, result: &str) -> Outcome {
        if result == ERROR_TEXT || !is_numeric_operand(result) {
            return Outcome::Ignored;
        }

        let state = &mut self.state;
        state.current = result.to_string();
        state.previous.clear();
        state.operation = None;
        state.ready_to_reset = true;
        Outcome::Updated
    }

    /// [`Calculator::set_from_history`] with the entry at `index` (0 is newest).
    pub fn recall_history(&mut self, index: usize) -> Outcome {
        match self.history.get(index).map(|entry| entry.result.clone()) {
            Some(result) => self.set_from_history(&result),
            None => Outcome::Ignored,
        }
    }

    fn fail(&mut self) -> Outcome {
        let state = &mut self.state;
        state.current = ERROR_TEXT.to_string();
        state.previous.clear();
        state.operation = None;
        state.ready_to_reset = true;
        Outcome::Failed
    }

    fn record(&mut self, expression: String, result: &str) {
        let entry = HistoryEntry::new(expression, result);
        tracing::debug!(%entry, "recording history");
        if let Err(e) = self.history.append(entry) {
            tracing::warn!(error = %e, "failed to persist history entry");
        }
    }
}

/// Parse an operand the way the keypad typed it. `"5."` is 5; `""`, `"-"`,
/// `"."` and the error sentinel are not numbers.
fn parse_operand(text: &str) -> Option<f64> {
    if !is_numeric_operand(text) {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Digits with optional sign, decimal point and exponent (as produced by the
/// number formatter). Rejects `inf`, `NaN` and friends that `f64::from_str`
/// would accept.
fn is_numeric_operand(text: &str) -> bool {
    !text.is_empty()
        && text.chars().any(|c| c.is_ascii_digit())
        && text.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e'))
        && text.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}
