//! One-shot subcommands: `eval` and `history`.
//!
//! Both return the text to print so they can be tested without a terminal.

use anyhow::Context;
use serde_json::json;
use tally_core::{Action, Calculator, HistoryStore};

/// Press `tokens` on `calc` and describe the result.
///
/// Computations are recorded into the calculator's history like interactive ones.
pub fn eval<H: HistoryStore>(calc: &mut Calculator<H>, tokens: &[String], as_json: bool) -> anyhow::Result<String> {
    let actions = Action::parse_script(tokens).context("invalid keypad input")?;

    for action in actions {
        let outcome = calc.apply(action);
        tracing::debug!(?action, ?outcome, "applied");
    }

    let display = calc.display();
    if as_json {
        let value = json!({
            "display": display,
            "state": calc.state(),
        });
        return serde_json::to_string_pretty(&value).context("failed to serialize state");
    }

    Ok([display.previous, display.current]
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" "))
}

/// List saved history (newest first), or clear it.
pub fn history<H: HistoryStore>(history: &mut H, clear: bool, as_json: bool) -> anyhow::Result<String> {
    if clear {
        let count = history.len();
        history.clear().context("failed to clear history")?;
        return Ok(format!("Cleared {} history entries", count));
    }

    let entries = history.load_all();
    if as_json {
        return serde_json::to_string_pretty(&entries).context("failed to serialize history");
    }
    if entries.is_empty() {
        return Ok("No history yet".to_string());
    }

    let width = entries.len().to_string().len();
    Ok(entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{:>width$}. {} {}", i + 1, entry.expression, entry.result, width = width))
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{HistoryEntry, MemoryStore, PersistentHistory};

    fn tokens(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    fn run(line: &str) -> String {
        eval(&mut Calculator::new(), &tokens(line), false).unwrap()
    }

    #[test]
    fn test_eval_prints_result() {
        assert_eq!(run("2 + 3 × 4 ="), "20");
    }

    #[test]
    fn test_eval_prints_pending_operation() {
        assert_eq!(run("7 ×"), "7 ×");
        assert_eq!(run("7 × 2"), "7 × 2");
    }

    #[test]
    fn test_eval_error_state() {
        assert_eq!(run("5 ÷ 0 ="), "Error");
    }

    #[test]
    fn test_eval_json() {
        let out = eval(&mut Calculator::new(), &tokens("5 fact"), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["display"]["current"], "120");
        assert_eq!(value["state"]["ready_to_reset"], true);
    }

    #[test]
    fn test_eval_rejects_unknown_token() {
        let err = eval(&mut Calculator::new(), &tokens("2 mod 3"), false).unwrap_err();
        assert!(format!("{:#}", err).contains("mod"));
    }

    #[test]
    fn test_eval_records_persistent_history() {
        let history = PersistentHistory::open(MemoryStore::new()).unwrap();
        let mut calc = Calculator::with_history(history);
        eval(&mut calc, &tokens("6 × 7 ="), false).unwrap();

        let reopened = PersistentHistory::open(calc.into_history().into_store()).unwrap();
        assert_eq!(reopened.load_all(), vec![HistoryEntry::new("6 × 7 =", "42")]);
    }

    #[test]
    fn test_history_listing() {
        let mut history = PersistentHistory::open(MemoryStore::new()).unwrap();
        assert_eq!(super::history(&mut history, false, false).unwrap(), "No history yet");

        history.append(HistoryEntry::new("2 + 3 =", "5")).unwrap();
        history.append(HistoryEntry::new("5 × 4 =", "20")).unwrap();
        let out = super::history(&mut history, false, false).unwrap();
        assert_eq!(out, "1. 5 × 4 = 20\n2. 2 + 3 = 5");
    }

    #[test]
    fn test_history_json() {
        let mut history = PersistentHistory::open(MemoryStore::new()).unwrap();
        history.append(HistoryEntry::new("π =", "3.141592654")).unwrap();
        let out = super::history(&mut history, false, true).unwrap();
        let entries: Vec<HistoryEntry> = serde_json::from_str(&out).unwrap();
        assert_eq!(entries[0].expression, "π =");
    }

    #[test]
    fn test_history_clear() {
        let mut history = PersistentHistory::open(MemoryStore::new()).unwrap();
        history.append(HistoryEntry::new("2 + 3 =", "5")).unwrap();

        let out = super::history(&mut history, true, false).unwrap();
        assert_eq!(out, "Cleared 1 history entries");
        assert!(history.is_empty());
    }
}
