//! Persisted role context
//!
//! The current actor role is process-wide and read synchronously. A change is
//! written straight through, so the next render of any view sees it.

use ncr_core::{normalize, Role};

use crate::error::StoreError;
use crate::kv::SharedStore;

/// Current role, persisted under its own key
#[derive(Debug, Clone)]
pub struct RoleContext {
    store: SharedStore,
    key: String,
}

impl RoleContext {
    /// Role under `key` in `store`
    #[must_use]
    pub fn new(store: SharedStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Stored label exactly as written, before normalization
    ///
    /// # Errors
    /// Backend failures.
    pub fn raw_label(&self) -> Result<Option<String>, StoreError> {
        self.store.get(&self.key)
    }

    /// Current role, `Quality` when unset
    ///
    /// A stored label that is not a known role also falls back to `Quality`.
    ///
    /// # Errors
    /// Backend failures.
    pub fn role(&self) -> Result<Role, StoreError> {
        let Some(raw) = self.raw_label()? else {
            return Ok(Role::default());
        };
        match normalize(&raw).parse() {
            Ok(role) => Ok(role),
            Err(e) => {
                tracing::warn!("Ignoring stored role: {}", e);
                Ok(Role::default())
            }
        }
    }

    /// Persist a new role
    ///
    /// # Errors
    /// Backend failures.
    pub fn set_role(&self, role: Role) -> Result<(), StoreError> {
        self.store.set(&self.key, role.label())?;
        tracing::info!("Role changed to {}", role.display_name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{KvStore, MemoryStore};
    use std::sync::Arc;

    #[test]
    fn unset_role_defaults_to_quality() {
        let ctx = RoleContext::new(MemoryStore::shared(), "ncrUserRole");
        assert_eq!(ctx.role().unwrap(), Role::Quality);
        assert_eq!(ctx.raw_label().unwrap(), None);
    }

    #[test]
    fn legacy_label_is_normalized_on_read() {
        let kv = Arc::new(MemoryStore::new());
        kv.set("ncrUserRole", "Operational Manager").unwrap();
        let ctx = RoleContext::new(kv, "ncrUserRole");
        assert_eq!(ctx.role().unwrap(), Role::Procurement);
        assert_eq!(ctx.raw_label().unwrap().as_deref(), Some("Operational Manager"));
    }

    #[test]
    fn set_role_writes_canonical_label() {
        let kv = Arc::new(MemoryStore::new());
        let ctx = RoleContext::new(kv.clone(), "ncrUserRole");
        ctx.set_role(Role::Inspector).unwrap();
        assert_eq!(kv.get("ncrUserRole").unwrap().as_deref(), Some("Inspector"));
    }

    #[test]
    fn unknown_label_falls_back() {
        let kv = Arc::new(MemoryStore::new());
        kv.set("ncrUserRole", "Auditor").unwrap();
        let ctx = RoleContext::new(kv, "ncrUserRole");
        assert_eq!(ctx.role().unwrap(), Role::Quality);
    }
}
