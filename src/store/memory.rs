use std::collections::HashMap;

use parking_lot::Mutex;

use crate::app::Result;
use crate::store::KeyValueStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Vec<String>>>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(key: &str, values: &[&str]) -> Self {
        let store = Self::new();
        store.values.lock().insert(
            key.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        );
        store
    }

    /// Number of `store` calls so far.
    pub fn writes(&self) -> usize {
        *self.writes.lock()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Vec<String>>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn store(&self, key: &str, values: &[String]) -> Result<()> {
        self.values.lock().insert(key.to_string(), values.to_vec());
        *self.writes.lock() += 1;
        Ok(())
    }
}
