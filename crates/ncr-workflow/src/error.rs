//! Error types for the NCR workflow
//!
//! Provides error handling for:
//! - Blocked submits (validation, authorization, missing records)
//! - Stage navigation refused by the tab lock
//! - Report export

use ncr_core::{Role, Section, Stage};
use ncr_store::StoreError;

use crate::validation::ValidationReport;

/// Why a stage submit did not go through
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// One or more fields failed validation; nothing was persisted
    #[error("{}", .0.summary())]
    Validation(ValidationReport),

    /// The role may not edit the submitted stage
    #[error("{role} may not submit the {stage} stage")]
    Forbidden {
        /// Acting role
        role: Role,
        /// Stage that was submitted
        stage: Stage,
    },

    /// The form names a record that is not in the store
    #[error("no NCR numbered {0}")]
    RecordNotFound(String),

    /// A new record reused an existing number
    #[error("NCR number {0} is already in use")]
    DuplicateNumber(String),

    /// Persistence failed
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl SubmitError {
    /// Whether the user can fix the problem by editing the form
    #[inline]
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::RecordNotFound(_) | Self::DuplicateNumber(_)
        )
    }

    /// Validation report, when that is the cause
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationReport> {
        match self {
            Self::Validation(report) => Some(report),
            _ => None,
        }
    }
}

/// Tab navigation refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    /// Navigation is locked to another section
    #[error("navigation is locked to {locked_to}")]
    Locked {
        /// Only reachable section
        locked_to: Section,
    },

    /// Target names a section this page does not have
    #[error("unknown section target: {0}")]
    UnknownTarget(String),
}

/// Report export failures
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Renderer could not produce output
    #[error("render failed: {0}")]
    Render(String),

    /// Serialization failed
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
