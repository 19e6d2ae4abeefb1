//! Record list persistence
//!
//! All records live as one JSON array under a single key. Every mutation is a
//! read-modify-write of the whole list inside one call.

use ncr_core::NcrRecord;

use crate::error::StoreError;
use crate::kv::SharedStore;

/// The serialized NCR list
#[derive(Debug, Clone)]
pub struct RecordStore {
    store: SharedStore,
    key: String,
}

impl RecordStore {
    /// Records under `key` in `store`
    #[must_use]
    pub fn new(store: SharedStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Every record, in insertion order
    ///
    /// A value that does not parse as a record list reads as empty.
    ///
    /// # Errors
    /// Backend failures only.
    pub fn load(&self) -> Result<Vec<NcrRecord>, StoreError> {
        match self.load_strict() {
            Err(StoreError::Unreadable { key, reason }) => {
                tracing::warn!(
                    "Stored record list under {} is unreadable, using empty list: {}",
                    key,
                    reason
                );
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Every record, failing with [`StoreError::Unreadable`] on a bad value
    ///
    /// # Errors
    /// Backend and parse failures.
    pub fn load_strict(&self) -> Result<Vec<NcrRecord>, StoreError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| StoreError::Unreadable {
            key: self.key.clone(),
            reason: e.to_string(),
        })
    }

    /// Replace the whole list
    ///
    /// # Errors
    /// Serialization or backend failures.
    pub fn save(&self, records: &[NcrRecord]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(records)?;
        self.store.set(&self.key, &raw)
    }

    /// Append a record, returning its position
    ///
    /// # Errors
    /// As [`RecordStore::load`] and [`RecordStore::save`].
    pub fn append(&self, record: NcrRecord) -> Result<usize, StoreError> {
        self.update(|records| {
            records.push(record);
            records.len() - 1
        })
    }

    /// Load, mutate and save in one step
    ///
    /// An unreadable list is left alone rather than replaced.
    ///
    /// # Errors
    /// As [`RecordStore::load_strict`] and [`RecordStore::save`].
    pub fn update<R>(&self, f: impl FnOnce(&mut Vec<NcrRecord>) -> R) -> Result<R, StoreError> {
        let mut records = self.load_strict()?;
        let out = f(&mut records);
        self.save(&records)?;
        Ok(out)
    }

    /// Record with the given number
    ///
    /// # Errors
    /// As [`RecordStore::load`].
    pub fn find(&self, number: &str) -> Result<Option<NcrRecord>, StoreError> {
        Ok(self
            .load()?
            .into_iter()
            .find(|r| r.number.as_deref() == Some(number)))
    }

    /// Most recently appended record
    ///
    /// # Errors
    /// As [`RecordStore::load`].
    pub fn last(&self) -> Result<Option<NcrRecord>, StoreError> {
        Ok(self.load()?.pop())
    }

    /// Number of records
    ///
    /// # Errors
    /// As [`RecordStore::load`].
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.load()?.len())
    }

    /// True when the list is empty or unreadable
    ///
    /// # Errors
    /// As [`RecordStore::load`].
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.load()?.is_empty())
    }
}
