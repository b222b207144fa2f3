//! # Number Formatting
//!
//! Display strings for computed values.
//!
//! A result is shown in its shortest round-trip decimal form. When that form
//! is longer than [`MAX_DISPLAY_LEN`] characters the value is rounded to
//! [`COMPACT_PRECISION`] significant digits instead.
//!
//! Layout follows the usual calculator/JavaScript conventions rather than
//! Rust's `Display` for `f64`: plain decimals between `1e-6` and `1e21`,
//! exponent notation with an explicit sign (`1e+21`, `1e-7`) outside that
//! range.
//!
//! ## Example
//!
//! ```rust
//! use tally_core::format::format_number;
//!
//! assert_eq!(format_number(120.0), "120");
//! assert_eq!(format_number(0.1 + 0.2), "0.3000000000");
//! assert_eq!(format_number(1e21), "1e+21");
//! ```

/// Longest shortest-form string shown verbatim
pub const MAX_DISPLAY_LEN: usize = 15;

/// Significant digits used when the shortest form is too long
pub const COMPACT_PRECISION: usize = 10;

/// Exponent (as decimal point position) at which plain notation stops
const PLAIN_POSITION_LIMIT: i32 = 21;

/// Smallest decimal point position still written as `0.000ddd`
const SMALL_POSITION_LIMIT: i32 = -6;

/// Digits after the point that expand any finite `f64` exactly
const EXACT_DIGITS: usize = 767;

/// Format a computed value for the display.
pub fn format_number(n: f64) -> String {
    let shortest = shortest_string(n);
    if shortest.chars().count() > MAX_DISPLAY_LEN {
        to_precision(n, COMPACT_PRECISION)
    } else {
        shortest
    }
}

/// Shortest decimal string that parses back to `n`.
pub fn shortest_string(n: f64) -> String {
    if let Some(special) = special_value(n) {
        return special;
    }
    if n < 0.0 {
        return format!("-{}", shortest_string(-n));
    }

    let (digits, exponent) = decompose(&format!("{:e}", n));
    let k = digits.len() as i32;
    let position = exponent + 1;

    if k <= position && position <= PLAIN_POSITION_LIMIT {
        format!("{}{}", digits, "0".repeat((position - k) as usize))
    } else if 0 < position && position <= PLAIN_POSITION_LIMIT {
        let (int_part, frac_part) = digits.split_at(position as usize);
        format!("{}.{}", int_part, frac_part)
    } else if SMALL_POSITION_LIMIT < position && position <= 0 {
        format!("0.{}{}", "0".repeat((-position) as usize), digits)
    } else {
        exponential(&digits, exponent)
    }
}

/// `n` rounded to `precision` significant digits, trailing zeros kept.
pub fn to_precision(n: f64, precision: usize) -> String {
    if let Some(special) = special_value(n) {
        return special;
    }
    if n < 0.0 {
        return format!("-{}", to_precision(-n, precision));
    }

    let precision = precision.max(1);
    let (digits, exponent) = round_significant(n, precision);
    let p = precision as i32;

    if exponent < SMALL_POSITION_LIMIT || exponent >= p {
        exponential(&digits, exponent)
    } else if exponent == p - 1 {
        digits
    } else if exponent >= 0 {
        let (int_part, frac_part) = digits.split_at(exponent as usize + 1);
        format!("{}.{}", int_part, frac_part)
    } else {
        format!("0.{}{}", "0".repeat((-exponent - 1) as usize), digits)
    }
}

/// Significant digits of `n` rounded to `precision`, ties away from zero.
///
/// Rust's `{:.*e}` breaks exact ties to even, so ties are detected on the
/// full decimal expansion and rounded up here.
fn round_significant(n: f64, precision: usize) -> (String, i32) {
    let (exact, exponent) = decompose(&format!("{:.*e}", EXACT_DIGITS, n));
    let (kept, rest) = exact.split_at(precision.min(exact.len()));
    let is_tie = rest.starts_with('5') && rest[1..].bytes().all(|b| b == b'0');
    if !is_tie {
        return decompose(&format!("{:.*e}", precision - 1, n));
    }

    match increment(kept) {
        Some(digits) => (digits, exponent),
        None => (format!("1{}", "0".repeat(precision - 1)), exponent + 1),
    }
}

/// Add one to a string of decimal digits. `None` when every digit is 9.
fn increment(digits: &str) -> Option<String> {
    let mut bytes = digits.as_bytes().to_vec();
    let last = bytes.iter().rposition(|&b| b != b'9')?;
    bytes[last] += 1;
    bytes[last + 1..].fill(b'0');
    String::from_utf8(bytes).ok()
}

fn special_value(n: f64) -> Option<String> {
    if n.is_nan() {
        Some("NaN".to_string())
    } else if n.is_infinite() {
        Some(if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string())
    } else if n == 0.0 {
        // Covers negative zero too.
        Some("0".to_string())
    } else {
        None
    }
}

/// Split Rust's `{:e}` output (`"1.2345e-7"`) into its significant digits
/// (`"12345"`) and base-10 exponent (`-7`).
fn decompose(scientific: &str) -> (String, i32) {
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific, "0"));
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    (digits, exponent.parse().unwrap_or(0))
}

fn exponential(digits: &str, exponent: i32) -> String {
    let sign = if exponent >= 0 { '+' } else { '-' };
    let (lead, rest) = digits.split_at(1);
    if rest.is_empty() {
        format!("{}e{}{}", lead, sign, exponent.abs())
    } else {
        format!("{}.{}e{}{}", lead, rest, sign, exponent.abs())
    }
}
