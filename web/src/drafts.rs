//! Local mirroring of in-progress form data.
//!
//! Every edit of a form is written to `localStorage` under
//! `esg.draft.<form>` so a reload does not lose unsaved input. The draft is
//! cleared once the record has been saved to the server.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::browser::local_storage;
use crate::utils::error::{AppError, Result};

pub const DRAFT_PREFIX: &str = "esg.draft.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft<T> {
    pub form: String,
    pub saved_at: DateTime<Utc>,
    pub data: T,
}

/// Minimal string key/value storage.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Browser `localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage> {
        local_storage().ok_or_else(|| AppError::Storage("localStorage unavailable".to_string()))
    }
}

impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| AppError::Storage(format!("failed to read {key}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| AppError::Storage(format!("failed to write {key} (quota exceeded?)")))
    }

    fn remove(&self, key: &str) -> Result<()> {
        Self::storage()?
            .remove_item(key)
            .map_err(|_| AppError::Storage(format!("failed to remove {key}")))
    }
}

/// In-memory storage, used off the browser.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

pub fn draft_key(form: &str) -> String {
    format!("{DRAFT_PREFIX}{form}")
}

pub struct DraftStore<S = LocalStorage> {
    storage: S,
}

impl DraftStore<LocalStorage> {
    pub fn local() -> Self {
        Self {
            storage: LocalStorage,
        }
    }
}

impl<S: KeyValueStorage> DraftStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn save<T: Serialize>(&self, form: &str, data: &T) -> Result<()> {
        let draft = Draft {
            form: form.to_string(),
            saved_at: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&draft)?;
        self.storage.set(&draft_key(form), &json)
    }

    /// Load the draft for `form`. A stored value that no longer matches `T`
    /// (e.g. after a form changed shape) is dropped and reported as absent.
    pub fn load<T: DeserializeOwned>(&self, form: &str) -> Result<Option<Draft<T>>> {
        let key = draft_key(form);
        let Some(raw) = self.storage.get(&key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(draft) => Ok(Some(draft)),
            Err(e) => {
                log::warn!("Discarding unreadable draft {key}: {e}");
                self.storage.remove(&key)?;
                Ok(None)
            }
        }
    }

    pub fn clear(&self, form: &str) -> Result<()> {
        self.storage.remove(&draft_key(form))
    }
}
