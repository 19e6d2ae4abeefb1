//! NCR Workflow - role-gated multi-stage review of non-conformance reports
//!
//! Builds on `ncr-core` (types, numbering, configuration) and `ncr-store`
//! (persistence) to provide:
//! - Field authorization per role and section
//! - The stage/tab controller with its role lock
//! - Per-stage form validators
//! - Submit handlers that append, merge and advance records
//! - View-model, dashboard rows, notifications and report export
//!
//! # Example
//!
//! ```rust
//! use ncr_core::{Stage, WorkflowConfig};
//! use ncr_store::MemoryStore;
//! use ncr_workflow::Workflow;
//!
//! let workflow = Workflow::new(MemoryStore::shared(), WorkflowConfig::default());
//! let blocked = workflow.submit(Stage::Quality, &workflow.cancel().unwrap());
//! assert!(blocked.unwrap_err().validation().is_some());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod authorization;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod notifications;
pub mod stage_controller;
pub mod validation;
pub mod view;
pub mod workflow;

pub use authorization::{
    apply_authorization, ControlView, SectionView, EDITABLE_CLASS, LOCKED_CLASS,
};
pub use dashboard::{dashboard_rows, row_action, DashboardRow, RowAction};
pub use error::{ExportError, StageError, SubmitError};
pub use export::{
    report_file_name, ExportOptions, JsonReportRenderer, Orientation, Report, ReportRenderer,
    ReportSection,
};
pub use notifications::{next_audience, NotificationCenter};
pub use stage_controller::{PageLocation, StageController, Tab, Target};
pub use validation::{validate_stage, ChoiceGroup, ValidationReport};
pub use view::{view_model, visible_sections, SectionState, ViewModel};
pub use workflow::{Navigation, SubmitOutcome, Workflow};
