//! NCR Store - key/value persistence for the NCR workflow
//!
//! Three values live in one opaque key/value store:
//! - the record list (one JSON array)
//! - the current role label
//! - the notification board
//!
//! Components share one [`SharedStore`] handle and never cache: every read
//! goes to the backend, every write replaces the whole value.
//!
//! # Example
//!
//! ```rust
//! use ncr_core::{Role, StorageKeys};
//! use ncr_store::{MemoryStore, RoleContext};
//!
//! let keys = StorageKeys::default();
//! let role = RoleContext::new(MemoryStore::shared(), keys.role);
//! assert_eq!(role.role().unwrap(), Role::Quality);
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod kv;
pub mod notifications;
pub mod records;
pub mod role;

pub use error::StoreError;
pub use kv::{FileStore, KvStore, MemoryStore, SharedStore};
pub use notifications::NotificationStore;
pub use records::RecordStore;
pub use role::RoleContext;
