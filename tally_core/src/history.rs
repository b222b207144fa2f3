//! # Computation History
//!
//! Completed computations as `(expression, result)` pairs, newest first,
//! capped at [`HISTORY_LIMIT`] entries.
//!
//! - [`History`] keeps entries in memory only.
//! - [`PersistentHistory`] mirrors every change into a [`KeyValueStore`]
//!   under [`HISTORY_KEY`], so history survives restarts.
//!
//! ## Example
//!
//! ```rust
//! use tally_core::history::{History, HistoryEntry, HistoryStore};
//!
//! let mut history = History::new();
//! history.append(HistoryEntry::new("2 + 3 =", "5")).unwrap();
//! history.append(HistoryEntry::new("5 × 4 =", "20")).unwrap();
//!
//! let entries = history.load_all();
//! assert_eq!(entries[0].result, "20");
//! assert_eq!(entries[1].result, "5");
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::store::{KeyValueStore, HISTORY_KEY};

/// Maximum number of entries kept
pub const HISTORY_LIMIT: usize = 50;

/// One completed computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Expression label, e.g. `"2 + 3 ="` or `"sin(30) ="`
    pub expression: String,
    /// Formatted result shown after the computation
    pub result: String,
}

impl HistoryEntry {
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        HistoryEntry {
            expression: expression.into(),
            result: result.into(),
        }
    }
}

impl std::fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.expression, self.result)
    }
}

/// Ordered record of completed computations.
///
/// Implementations keep entries newest-first and never hold more than
/// [`HISTORY_LIMIT`].
pub trait HistoryStore {
    /// Record a computation as the newest entry, evicting the oldest on overflow.
    fn append(&mut self, entry: HistoryEntry) -> CalcResult<()>;

    /// Remove every entry.
    fn clear(&mut self) -> CalcResult<()>;

    /// All entries, newest first.
    fn load_all(&self) -> Vec<HistoryEntry>;

    /// Entry at `index` (0 is the newest).
    fn get(&self, index: usize) -> Option<&HistoryEntry>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        History::default()
    }

    /// Build from a newest-first list, dropping anything past the limit.
    pub fn from_entries(entries: impl IntoIterator<Item = HistoryEntry>) -> Self {
        History {
            entries: entries.into_iter().take(HISTORY_LIMIT).collect(),
        }
    }

    fn push_newest(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_LIMIT);
    }
}

impl HistoryStore for History {
    fn append(&mut self, entry: HistoryEntry) -> CalcResult<()> {
        self.push_newest(entry);
        Ok(())
    }

    fn clear(&mut self) -> CalcResult<()> {
        self.entries.clear();
        Ok(())
    }

    fn load_all(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// History mirrored into a key-value store.
///
/// The whole list is stored as one JSON array under [`HISTORY_KEY`] and
/// rewritten after every change. The in-memory copy is updated first, so a
/// failed write still leaves the entry visible for the current session.
pub struct PersistentHistory<S: KeyValueStore> {
    store: S,
    entries: History,
}

impl<S: KeyValueStore> PersistentHistory<S> {
    /// Load any history already saved in `store`.
    ///
    /// A missing key is an empty history. A value that is not a valid entry
    /// list is reported as `SerializationError`.
    pub fn open(store: S) -> CalcResult<Self> {
        let entries = match store.get(HISTORY_KEY)? {
            Some(json) => {
                let list: Vec<HistoryEntry> = serde_json::from_str(&json).map_err(|e| {
                    CalcError::serialization(format!("Invalid history under '{}': {}", HISTORY_KEY, e))
                })?;
                History::from_entries(list)
            }
            None => History::new(),
        };
        tracing::debug!(count = entries.len(), "loaded history");
        Ok(PersistentHistory { store, entries })
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Give back the backing store
    pub fn into_store(self) -> S {
        self.store
    }

    fn save(&mut self) -> CalcResult<()> {
        let json = serde_json::to_string(&self.entries.load_all()).map_err(CalcError::serialization)?;
        self.store.set(HISTORY_KEY, &json)
    }
}

impl<S: KeyValueStore> HistoryStore for PersistentHistory<S> {
    fn append(&mut self, entry: HistoryEntry) -> CalcResult<()> {
        self.entries.push_newest(entry);
        self.save()
    }

    fn clear(&mut self) -> CalcResult<()> {
        self.entries.entries.clear();
        self.store.remove(HISTORY_KEY)
    }

    fn load_all(&self) -> Vec<HistoryEntry> {
        self.entries.load_all()
    }

    fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
