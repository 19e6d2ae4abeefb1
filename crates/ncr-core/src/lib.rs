//! NCR Core - domain types for the Non-Conformance Report workflow
//!
//! Defines the vocabulary every other crate speaks:
//! - Roles and their legacy-label normalization
//! - The fixed stage sequence and the sections each stage owns
//! - NCR records, split per stage and merged without clearing earlier fields
//! - Raw form values and field identifiers
//! - NCR number generation
//! - Notification panel entries
//! - The role → section authorization table and workflow configuration
//!
//! # Example
//!
//! ```rust
//! use ncr_core::{generate_ncr_number, normalize, Role, Stage};
//!
//! assert_eq!(normalize("Operational Manager"), "Procurement");
//! assert_eq!(Stage::for_role(Role::Engineer), Stage::Engineering);
//!
//! let first = generate_ncr_number(std::iter::empty(), 2026);
//! assert_eq!(first.to_string(), "NCR-2026-011");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod access;
pub mod config;
pub mod error;
pub mod form;
pub mod notification;
pub mod number;
pub mod record;
pub mod role;
pub mod stage;

// Re-exports for convenience
pub use access::{AuthorizationTable, RoleGrant};
pub use config::{StagePages, StorageKeys, WorkflowConfig};
pub use error::{ConfigError, ParseError};
pub use form::{fields, stage_fields, FormValues};
pub use notification::{Audience, Notification, NotificationBoard, NotificationKind};
pub use number::{generate_ncr_number, NcrNumber, SEQUENCE_FLOOR};
pub use record::{
    Disposition, EngineeringSection, InspectorSection, NcrRecord, ProcurementSection,
    QualitySection, StageFields, SupplierDisposition, STATUS_CLOSED, STATUS_IN_PROGRESS,
};
pub use role::{normalize, parse_label, Permissions, Role};
pub use stage::{Section, Stage};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
