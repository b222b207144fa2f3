//! # Key-Value Store
//!
//! A small string-to-string store for state that outlives a session: the
//! selected theme and the serialized history list. The calculator engine
//! never touches it directly; UI front ends and [`PersistentHistory`] do.
//!
//! - [`MemoryStore`] - `HashMap` backed, for tests and ephemeral sessions
//! - [`FileStore`] - a JSON document on disk with atomic saves and locking
//!
//! [`PersistentHistory`]: crate::history::PersistentHistory

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(not(target_arch = "wasm32"))]
pub use file::{FileStore, StoreDocument, STORE_SCHEMA_VERSION};

use std::collections::HashMap;

use crate::errors::CalcResult;

/// Key holding the last selected theme name
pub const THEME_KEY: &str = "calculator-theme";

/// Key holding the JSON-serialized history list
pub const HISTORY_KEY: &str = "calculator-history";

/// String key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> CalcResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> CalcResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> CalcResult<()>;
}

/// In-memory store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CalcResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CalcResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> CalcResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> CalcResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> CalcResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> CalcResult<()> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basics() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(THEME_KEY).unwrap(), None);

        store.set(THEME_KEY, "dark").unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        store.set(THEME_KEY, "light").unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert_eq!(store.len(), 1);

        store.remove(THEME_KEY).unwrap();
        store.remove(THEME_KEY).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_boxed_store() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set(HISTORY_KEY, "[]").unwrap();
        assert_eq!(store.get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
    }
}
