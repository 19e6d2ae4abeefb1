//! Error types for NCR core
//!
//! Provides error handling for:
//! - Parsing stored labels (roles, stages, choices, NCR numbers)
//! - Loading workflow configuration

use std::path::PathBuf;

/// Failure to parse a stored or user-supplied label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Label is not a canonical role
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// Label is not a workflow stage
    #[error("unknown stage: {0}")]
    UnknownStage(String),

    /// Value is not one of a choice group's options
    #[error("invalid choice {value:?} for {group}")]
    InvalidChoice {
        /// Choice group field id
        group: &'static str,
        /// Offending value
        value: String,
    },

    /// Value is not an `NCR-<year>-<seq>` number
    #[error("malformed NCR number: {0}")]
    MalformedNumber(String),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    Read {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for [`crate::WorkflowConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but is inconsistent
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
