//! Workflow configuration
//!
//! Everything a deployment may want to change without touching code: storage
//! keys, the authorization table, page URLs for each transition and a few
//! behavioural toggles. Every field has a default, so a TOML file only needs
//! the keys it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::access::AuthorizationTable;
use crate::error::ConfigError;
use crate::record::STATUS_IN_PROGRESS;
use crate::stage::Stage;

/// Workflow configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Keys used in the key/value store
    pub storage: StorageKeys,
    /// Role → editable sections
    pub authorization: AuthorizationTable,
    /// Navigation targets
    pub pages: StagePages,
    /// Status written on new records when the form leaves it blank
    pub default_status: String,
    /// Whether submits push a notification for the next stage
    pub emit_notifications: bool,
}

impl WorkflowConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a different authorization table
    #[inline]
    #[must_use]
    pub fn with_authorization(mut self, table: AuthorizationTable) -> Self {
        self.authorization = table;
        self
    }

    /// With notifications switched on or off
    #[inline]
    #[must_use]
    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.emit_notifications = enabled;
        self
    }

    /// Parses TOML text and validates the result
    ///
    /// # Errors
    /// [`ConfigError::Parse`] for malformed TOML, [`ConfigError::Invalid`] when
    /// the storage keys are empty or collide.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Read`] when the file cannot be read, otherwise as
    /// [`WorkflowConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded workflow config from {}", path.display());
        Ok(config)
    }

    /// Checks invariants serde cannot express
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let keys = [
            &self.storage.records,
            &self.storage.role,
            &self.storage.notifications,
        ];
        if keys.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid("storage keys must not be empty".into()));
        }
        if keys[0] == keys[1] || keys[0] == keys[2] || keys[1] == keys[2] {
            return Err(ConfigError::Invalid("storage keys must be distinct".into()));
        }
        Ok(())
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            storage: StorageKeys::default(),
            authorization: AuthorizationTable::default(),
            pages: StagePages::default(),
            default_status: STATUS_IN_PROGRESS.to_string(),
            emit_notifications: true,
        }
    }
}

/// Storage keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    /// Serialized record list
    pub records: String,
    /// Current role label
    pub role: String,
    /// Notification panel state
    pub notifications: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            records: "ncrList".to_string(),
            role: "ncrUserRole".to_string(),
            notifications: "ncrNotifications".to_string(),
        }
    }
}

/// Relative page URLs used for navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagePages {
    /// Quality form
    pub quality: String,
    /// Engineering form
    pub engineering: String,
    /// Procurement / operations form
    pub procurement: String,
    /// Final review form
    pub final_review: String,
    /// Dashboard, target of the confirmation modal
    pub dashboard: String,
    /// Read-only report page, accepts `?section=`
    pub view: String,
    /// Modal opened after the final submit
    pub confirmation_modal: String,
}

impl StagePages {
    /// Page hosting a stage's form
    #[must_use]
    pub fn for_stage(&self, stage: Stage) -> &str {
        match stage {
            Stage::Quality => &self.quality,
            Stage::Engineering => &self.engineering,
            Stage::Procurement => &self.procurement,
            Stage::Final => &self.final_review,
        }
    }
}

impl Default for StagePages {
    fn default() -> Self {
        Self {
            quality: "Create-NCR.html".to_string(),
            engineering: "Create-NCR-Engineer.html".to_string(),
            procurement: "Create-NCR-Procurement.html".to_string(),
            final_review: "Create-NCR-Final.html".to_string(),
            dashboard: "Dashboard.html".to_string(),
            view: "View-NCR.html".to_string(),
            confirmation_modal: "submitModal".to_string(),
        }
    }
}
