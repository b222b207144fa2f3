//! # Operators and Scientific Functions
//!
//! Binary operators and unary scientific functions as closed enums, so an
//! invalid operator can never reach the engine.
//!
//! Both enums parse from the symbols printed on a keypad (`+`, `×`, `xʸ`,
//! `√`) as well as from plain names (`add`, `multiply`, `square-root`), which
//! is what script tokens and key bindings use.
//!
//! ## Example
//!
//! ```rust
//! use tally_core::operation::{Operation, ScientificFunction};
//!
//! let op: Operation = "×".parse().unwrap();
//! assert_eq!(op, Operation::Multiply);
//! assert_eq!(op.apply(6.0, 7.0), 42.0);
//!
//! let func: ScientificFunction = "sqrt".parse().unwrap();
//! assert_eq!(func.evaluate(81.0), 9.0);
//! ```

use std::f64::consts::{E, PI};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

/// Largest argument whose factorial is representable as a finite `f64`.
pub const FACTORIAL_LIMIT: u32 = 170;

/// Binary operator awaiting its right-hand operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// `previous` raised to the power of `current`
    Power,
}

impl Operation {
    /// Symbol shown in the display and in history labels
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "−",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
            Operation::Power => "^",
        }
    }

    /// Plain identifier (e.g., "add", "power")
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Power => "power",
        }
    }

    /// Apply the operator. Overflow and division by zero are returned as
    /// non-finite values for the caller to reject.
    pub fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operation::Add => lhs + rhs,
            Operation::Subtract => lhs - rhs,
            Operation::Multiply => lhs * rhs,
            Operation::Divide => lhs / rhs,
            Operation::Power => lhs.powf(rhs),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Operation {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "+" | "add" | "plus" => Ok(Operation::Add),
            "-" | "−" | "subtract" | "minus" => Ok(Operation::Subtract),
            "*" | "×" | "x" | "multiply" | "times" => Ok(Operation::Multiply),
            "/" | "÷" | "divide" => Ok(Operation::Divide),
            "^" | "xʸ" | "pow" | "power" => Ok(Operation::Power),
            _ => Err(CalcError::unknown_identifier("operator", s)),
        }
    }
}

/// Scientific keypad function.
///
/// Everything except [`ScientificFunction::Power`] is unary (or a constant)
/// and resolves immediately. `Power` is the keypad's `xʸ` key, which starts a
/// binary [`Operation::Power`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScientificFunction {
    Square,
    SquareRoot,
    Reciprocal,
    /// Sine of an angle in degrees
    Sin,
    /// Cosine of an angle in degrees
    Cos,
    /// Tangent of an angle in degrees
    Tan,
    Log10,
    Ln,
    Factorial,
    Pi,
    E,
    Power,
}

impl ScientificFunction {
    /// All functions in keypad order
    pub const ALL: [ScientificFunction; 12] = [
        ScientificFunction::Square,
        ScientificFunction::SquareRoot,
        ScientificFunction::Reciprocal,
        ScientificFunction::Sin,
        ScientificFunction::Cos,
        ScientificFunction::Tan,
        ScientificFunction::Log10,
        ScientificFunction::Ln,
        ScientificFunction::Factorial,
        ScientificFunction::Pi,
        ScientificFunction::E,
        ScientificFunction::Power,
    ];

    /// Kebab-case identifier
    pub fn name(&self) -> &'static str {
        match self {
            ScientificFunction::Square => "square",
            ScientificFunction::SquareRoot => "square-root",
            ScientificFunction::Reciprocal => "reciprocal",
            ScientificFunction::Sin => "sin",
            ScientificFunction::Cos => "cos",
            ScientificFunction::Tan => "tan",
            ScientificFunction::Log10 => "log10",
            ScientificFunction::Ln => "ln",
            ScientificFunction::Factorial => "factorial",
            ScientificFunction::Pi => "pi",
            ScientificFunction::E => "e",
            ScientificFunction::Power => "power",
        }
    }

    /// Name used in history labels, e.g. `sin` in `"sin(30) ="`
    pub fn label(&self) -> &'static str {
        match self {
            ScientificFunction::Square => "square",
            ScientificFunction::SquareRoot => "sqrt",
            ScientificFunction::Reciprocal => "reciprocal",
            ScientificFunction::Sin => "sin",
            ScientificFunction::Cos => "cos",
            ScientificFunction::Tan => "tan",
            ScientificFunction::Log10 => "log10",
            ScientificFunction::Ln => "ln",
            ScientificFunction::Factorial => "fact",
            ScientificFunction::Pi => "π",
            ScientificFunction::E => "e",
            ScientificFunction::Power => "pow",
        }
    }

    /// True for `pi` and `e`, which ignore the current operand
    pub fn is_constant(&self) -> bool {
        matches!(self, ScientificFunction::Pi | ScientificFunction::E)
    }

    /// Evaluate against `x`. Domain errors come back as NaN or infinity.
    ///
    /// `Power` is binary and has no unary value; it evaluates to NaN.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            ScientificFunction::Square => x.powi(2),
            ScientificFunction::SquareRoot => x.sqrt(),
            ScientificFunction::Reciprocal => 1.0 / x,
            ScientificFunction::Sin => degrees_to_radians(x).sin(),
            ScientificFunction::Cos => degrees_to_radians(x).cos(),
            ScientificFunction::Tan => degrees_to_radians(x).tan(),
            ScientificFunction::Log10 => x.log10(),
            ScientificFunction::Ln => x.ln(),
            ScientificFunction::Factorial => factorial(x),
            ScientificFunction::Pi => PI,
            ScientificFunction::E => E,
            ScientificFunction::Power => f64::NAN,
        }
    }
}

impl std::fmt::Display for ScientificFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ScientificFunction {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "sq" | "sqr" | "square" | "x²" => Ok(ScientificFunction::Square),
            "sqrt" | "√" | "square-root" | "root" => Ok(ScientificFunction::SquareRoot),
            "inv" | "1/x" | "reciprocal" => Ok(ScientificFunction::Reciprocal),
            "sin" => Ok(ScientificFunction::Sin),
            "cos" => Ok(ScientificFunction::Cos),
            "tan" => Ok(ScientificFunction::Tan),
            "log" | "log10" => Ok(ScientificFunction::Log10),
            "ln" => Ok(ScientificFunction::Ln),
            "fact" | "factorial" | "n!" | "!" => Ok(ScientificFunction::Factorial),
            "pi" | "π" => Ok(ScientificFunction::Pi),
            "e" => Ok(ScientificFunction::E),
            "pow" | "power" | "xʸ" => Ok(ScientificFunction::Power),
            _ => Err(CalcError::unknown_identifier("function", s)),
        }
    }
}

/// Keypad trig works in degrees.
fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Factorial of a non-negative integer.
///
/// Negative or fractional input is NaN. Anything above [`FACTORIAL_LIMIT`]
/// saturates to +∞ instead of overflowing.
pub fn factorial(n: f64) -> f64 {
    if n < 0.0 || n.fract() != 0.0 {
        return f64::NAN;
    }
    if n > FACTORIAL_LIMIT as f64 {
        return f64::INFINITY;
    }
    (2..=n as u32).fold(1.0, |acc, k| acc * k as f64)
}
