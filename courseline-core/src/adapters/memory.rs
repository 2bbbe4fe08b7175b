//! In-memory store implementation
//!
//! Backs the session-scoped keys (per-process, gone on exit) and doubles as
//! the test store. Same contract as the file adapter minus the disk.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::domain::result::{Error, Result};
use crate::ports::StateStore;

/// HashMap-backed keyed JSON store
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| Error::storage(format!("lock poisoned: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| Error::storage(format!("lock poisoned: {}", e)))?;
        entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| Error::storage(format!("lock poisoned: {}", e)))?;
        entries.remove(key);
        Ok(())
    }
}
