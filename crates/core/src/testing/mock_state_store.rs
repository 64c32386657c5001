//! Mock state store for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::persist::{PersistError, StateStore};

/// In-memory `StateStore` with scriptable failures.
#[derive(Default)]
pub struct MockStateStore {
    values: Mutex<HashMap<String, String>>,
    save_count: Mutex<usize>,
    fail_saves: Mutex<bool>,
}

impl MockStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last value saved under `key`, if any.
    pub fn saved(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        *self.save_count.lock().unwrap()
    }

    /// Make every following save fail.
    pub fn fail_saves(&self) {
        *self.fail_saves.lock().unwrap() = true;
    }
}

impl StateStore for MockStateStore {
    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        if *self.fail_saves.lock().unwrap() {
            return Err(PersistError::Database("simulated failure".to_string()));
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        *self.save_count.lock().unwrap() += 1;
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }
}
