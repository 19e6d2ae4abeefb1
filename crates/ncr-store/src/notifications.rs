//! Notification board persistence

use ncr_core::NotificationBoard;

use crate::error::StoreError;
use crate::kv::SharedStore;

/// Notification board under one key
#[derive(Debug, Clone)]
pub struct NotificationStore {
    store: SharedStore,
    key: String,
}

impl NotificationStore {
    /// Board under `key` in `store`
    #[must_use]
    pub fn new(store: SharedStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Current board; missing or unreadable state reads as empty
    ///
    /// # Errors
    /// Backend failures only.
    pub fn load(&self) -> Result<NotificationBoard, StoreError> {
        match self.load_strict() {
            Err(StoreError::Unreadable { key, reason }) => {
                tracing::warn!("Stored notifications under {} are unreadable: {}", key, reason);
                Ok(NotificationBoard::default())
            }
            other => other,
        }
    }

    /// Current board, failing with [`StoreError::Unreadable`] on a bad value
    ///
    /// # Errors
    /// Backend and parse failures.
    pub fn load_strict(&self) -> Result<NotificationBoard, StoreError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(NotificationBoard::default());
        };
        serde_json::from_str(&raw).map_err(|e| StoreError::Unreadable {
            key: self.key.clone(),
            reason: e.to_string(),
        })
    }

    /// Replace the board
    ///
    /// # Errors
    /// Serialization or backend failures.
    pub fn save(&self, board: &NotificationBoard) -> Result<(), StoreError> {
        let raw = serde_json::to_string(board)?;
        self.store.set(&self.key, &raw)
    }

    /// Load, mutate and save in one step; an unreadable board is left alone
    ///
    /// # Errors
    /// As [`NotificationStore::load_strict`] and [`NotificationStore::save`].
    pub fn update<R>(
        &self,
        f: impl FnOnce(&mut NotificationBoard) -> R,
    ) -> Result<R, StoreError> {
        let mut board = self.load_strict()?;
        let out = f(&mut board);
        self.save(&board)?;
        Ok(out)
    }
}
