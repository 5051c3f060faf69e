//! Key-value persistence for client preferences.

use std::cell::RefCell;
use std::collections::HashMap;

/// Durable string storage, shaped after the browser `localStorage` API.
pub trait KeyValueStore {
    /// `None` when the key is missing or the store is unavailable.
    fn get(&self, key: &str) -> Option<String>;

    /// Returns `true` if the value was written.
    fn set(&self, key: &str, value: &str) -> bool;

    /// Returns `true` if the removal succeeded.
    fn delete(&self, key: &str) -> bool;
}

/// In-process store, used off the browser and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key);
        true
    }
}
