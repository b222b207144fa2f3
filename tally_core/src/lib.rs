//! # tally_core - Keypad Calculator Engine
//!
//! `tally_core` is the computational heart of Tally: the state machine behind
//! a pocket-calculator keypad, its number formatting rules, and the history
//! of completed computations. Front ends (the `tally` terminal app, or any
//! other UI) translate key presses into [`Action`]s and render the
//! [`Display`] projection.
//!
//! ## Design Philosophy
//!
//! - **Permissive input**: keys that make no sense are ignored, never errors
//! - **Sticky arithmetic errors**: division by zero and friends show `Error`
//!   until cleared
//! - **Closed vocabularies**: operators and functions are enums
//! - **Serializable**: state, history and actions implement Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use tally_core::{Action, Calculator};
//!
//! let mut calc = Calculator::new();
//! for action in Action::parse_script(["12", "÷", "4", "="]).unwrap() {
//!     calc.apply(action);
//! }
//! assert_eq!(calc.display().current, "3");
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - Calculator state machine and display projection
//! - [`operation`] - Binary operators and scientific functions
//! - [`action`] - Keypad actions, key and script token parsing
//! - [`format`] - Display formatting of computed values
//! - [`history`] - Completed computations, in memory or persisted
//! - [`store`] - Key-value storage for history and UI preferences
//! - [`errors`] - Structured error types

pub mod action;
pub mod engine;
pub mod errors;
pub mod format;
pub mod history;
pub mod operation;
pub mod store;

// Re-export commonly used types at crate root for convenience
pub use action::Action;
pub use engine::{Calculator, CalculatorState, Display, Outcome, ERROR_TEXT};
pub use errors::{CalcError, CalcResult};
pub use format::format_number;
pub use history::{History, HistoryEntry, HistoryStore, PersistentHistory, HISTORY_LIMIT};
pub use operation::{Operation, ScientificFunction};
pub use store::{KeyValueStore, MemoryStore, HISTORY_KEY, THEME_KEY};

#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
