//! Error types for NCR storage

use std::path::PathBuf;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backing file could not be read or written
    #[error("storage I/O on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Value could not be serialized
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Backing file exists but is not a JSON object of strings
    #[error("corrupt store file {path}: {reason}")]
    Corrupt {
        /// File involved
        path: PathBuf,
        /// What was wrong
        reason: String,
    },

    /// Value under a key does not parse, so it must not be overwritten
    #[error("value under {key} is unreadable, refusing to overwrite: {reason}")]
    Unreadable {
        /// Key involved
        key: String,
        /// Parse failure
        reason: String,
    },
}

impl StoreError {
    /// Whether retrying the same call could succeed
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}
