//! Typed repository over a string key/value store.
//!
//! Records live under two key families: `progress` for the progress record
//! and `code_<lessonId>` for saved source text.

use std::sync::Arc;

use crate::error::StoreError;
use crate::progress::ProgressRecord;
use crate::store::KeyValueStore;

/// Key holding the serialized progress record.
pub const PROGRESS_KEY: &str = "progress";

/// Prefix of per-lesson saved code keys.
pub const CODE_PREFIX: &str = "code_";

/// Typed get/set/delete over dsquest's persisted records.
pub trait ProgressRepository: Send + Sync {
    /// The stored progress record; `None` when absent or unreadable.
    fn get_progress(&self) -> Result<Option<ProgressRecord>, StoreError>;

    fn set_progress(&self, record: &ProgressRecord) -> Result<(), StoreError>;

    /// Saved source text for a lesson, if any.
    fn get_code(&self, lesson_id: &str) -> Result<Option<String>, StoreError>;

    fn set_code(&self, lesson_id: &str, code: &str) -> Result<(), StoreError>;

    fn delete_code(&self, lesson_id: &str) -> Result<(), StoreError>;
}

/// `ProgressRepository` backed by any `KeyValueStore`.
pub struct KvProgressRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvProgressRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn code_key(lesson_id: &str) -> String {
        format!("{CODE_PREFIX}{lesson_id}")
    }
}

impl ProgressRepository for KvProgressRepository {
    fn get_progress(&self) -> Result<Option<ProgressRecord>, StoreError> {
        let Some(raw) = self.store.get(PROGRESS_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<ProgressRecord>(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!("stored progress is corrupt, ignoring it: {e}");
                Ok(None)
            }
        }
    }

    fn set_progress(&self, record: &ProgressRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record).map_err(|e| StoreError::Encode {
            key: PROGRESS_KEY.into(),
            message: e.to_string(),
        })?;
        self.store.set(PROGRESS_KEY, &json)
    }

    fn get_code(&self, lesson_id: &str) -> Result<Option<String>, StoreError> {
        self.store.get(&Self::code_key(lesson_id))
    }

    fn set_code(&self, lesson_id: &str, code: &str) -> Result<(), StoreError> {
        self.store.set(&Self::code_key(lesson_id), code)
    }

    fn delete_code(&self, lesson_id: &str) -> Result<(), StoreError> {
        self.store.delete(&Self::code_key(lesson_id))
    }
}
