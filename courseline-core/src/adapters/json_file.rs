//! JSON file store implementation
//!
//! One `<key>.json` document per key under the data directory. This is the
//! persistent half of the storage model; the memory adapter covers the
//! session-scoped half.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::result::{Error, Result};
use crate::ports::StateStore;

/// File-backed keyed JSON store
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at a directory, creating it if needed
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateStore for JsonFileStore {
    /// Load a document. Unreadable or unparsable content is self-healing:
    /// the backing file is removed and the key reads as absent. A document
    /// that parses to null or a non-container value also reads as absent.
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                eprintln!("[courseline] Error loading state for '{}': {}", key, e);
                let _ = fs::remove_file(&path);
                return Ok(None);
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Null) => Ok(None),
            Ok(value) if value.is_object() || value.is_array() => Ok(Some(value)),
            Ok(_) => Ok(None),
            Err(e) => {
                eprintln!("[courseline] Corrupt state for '{}', clearing: {}", key, e);
                let _ = fs::remove_file(&path);
                Ok(None)
            }
        }
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.path_for(key);
        let serialized = serde_json::to_string(value)?;
        fs::write(&path, serialized)
            .map_err(|e| Error::storage(format!("failed to write '{}': {}", key, e)))
    }

    fn clear(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::storage(format!("failed to clear '{}': {}", key, e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        let doc = json!({"courses": [{"id": "1"}]});
        store.save("cms_courses", &doc).unwrap();
        assert_eq!(store.load("cms_courses").unwrap(), Some(doc));
    }

    #[test]
    fn test_missing_key_loads_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        assert_eq!(store.load("cms_users").unwrap(), None);
    }

    #[test]
    fn test_corrupt_document_self_heals() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        std::fs::write(dir.path().join("cms_users.json"), "{not json!").unwrap();
        assert_eq!(store.load("cms_users").unwrap(), None);
        // The bad file is gone
        assert!(!dir.path().join("cms_users.json").exists());
    }

    #[test]
    fn test_scalar_document_loads_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        std::fs::write(dir.path().join("cms_auth.json"), "42").unwrap();
        assert_eq!(store.load("cms_auth").unwrap(), None);

        std::fs::write(dir.path().join("cms_auth.json"), "null").unwrap();
        assert_eq!(store.load("cms_auth").unwrap(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        store.save("remember_me", &json!({"value": true})).unwrap();
        store.clear("remember_me").unwrap();
        store.clear("remember_me").unwrap();
        assert_eq!(store.load("remember_me").unwrap(), None);
    }

}
