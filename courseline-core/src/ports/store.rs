//! State store port - keyed JSON persistence abstraction
//!
//! The whole persistence model is one JSON document per fixed string key,
//! written in full on every mutation. Implementations (adapters) provide the
//! actual storage: a file per key, or plain memory for session-scoped state
//! and tests.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::result::Result;

/// Keyed JSON store abstraction
///
/// Contract:
/// - `load` returns `None` for a missing key. A corrupt document is
///   self-healed: the key is cleared and `None` is returned.
/// - `save` is best-effort; failures surface as errors for the caller to
///   log and swallow, never to abort an operation.
/// - No transactions, no partial-write protection, no cross-process
///   coordination. Two processes writing the same key last-writer-win.
pub trait StateStore: Send + Sync {
    /// Load the document stored under a key
    fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Write the full document for a key
    fn save(&self, key: &str, value: &Value) -> Result<()>;

    /// Remove a key
    fn clear(&self, key: &str) -> Result<()>;
}

/// Typed load/save helpers layered over the raw JSON contract
pub trait StateStoreExt: StateStore {
    /// Load and deserialize a slice, treating a mismatched shape the same
    /// way as corruption: clear the key and fall back to `None`.
    fn load_slice<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.load(key)? {
            Some(value) => match serde_json::from_value(value) {
                Ok(parsed) => Ok(Some(parsed)),
                Err(_) => {
                    self.clear(key)?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Serialize and save a slice
    fn save_slice<T: Serialize>(&self, key: &str, slice: &T) -> Result<()> {
        let value = serde_json::to_value(slice)?;
        self.save(key, &value)
    }

    /// Load a scalar stored in a `{"value": ...}` wrapper. Keys holding a
    /// single flag or string use this shape so every document stays a JSON
    /// object.
    fn load_wrapped<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        #[derive(serde::Deserialize)]
        struct Wrapper<T> {
            value: T,
        }
        Ok(self
            .load_slice::<Wrapper<T>>(key)?
            .map(|wrapper| wrapper.value))
    }

    /// Save a scalar in a `{"value": ...}` wrapper
    fn save_wrapped<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.save(key, &serde_json::json!({ "value": value }))
    }
}

impl<S: StateStore + ?Sized> StateStoreExt for S {}

/// Fixed storage keys
pub mod keys {
    use super::Uuid;

    pub const USERS: &str = "cms_users";
    pub const COURSES: &str = "cms_courses";
    pub const ENROLLMENTS: &str = "cms_enrollments";
    pub const AUTH: &str = "cms_auth";
    pub const RESET_TOKENS: &str = "cms_reset_tokens";
    pub const REMEMBERED_EMAIL: &str = "remembered_email";
    pub const REMEMBERED_PASSWORD: &str = "remembered_password";
    pub const REMEMBER_ME: &str = "remember_me";

    /// Per-user last-read chat message marker (persistent)
    pub fn chatbot_last_read(user_id: Uuid) -> String {
        format!("chatbot_last_read_{}", user_id)
    }

    /// Per-user greeting-shown flag (session-scoped)
    pub fn chatbot_shown(user_id: Uuid) -> String {
        format!("chatbot_shown_{}", user_id)
    }

    /// Session-scoped flag set after account deletion, consumed by the
    /// next sign-in surface
    pub const ACCOUNT_DELETED: &str = "accountDeletedSuccess";
}
