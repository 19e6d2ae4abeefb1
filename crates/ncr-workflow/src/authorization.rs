//! Field authorization
//!
//! Applies the role → section table to a rendered form: every control in a
//! section the role may not edit is disabled and the section is tagged with
//! the locked presentation class. Re-applying for the same role changes
//! nothing.

use ncr_core::{stage_fields, AuthorizationTable, Role, Section};
use serde::Serialize;
use std::collections::BTreeSet;

/// Class on a section the role may edit
pub const EDITABLE_CLASS: &str = "section-editable";

/// Class on a section the role may not edit
pub const LOCKED_CLASS: &str = "section-locked";

/// One input of a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlView {
    pub field: String,
    pub disabled: bool,
}

/// A rendered, role-tagged form section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub section: Section,
    pub controls: Vec<ControlView>,
    pub classes: BTreeSet<String>,
}

impl SectionView {
    /// Section with all of its stage's controls, enabled and unclassed
    #[must_use]
    pub fn for_section(section: Section) -> Self {
        let controls = stage_fields(section.stage())
            .iter()
            .map(|field| ControlView {
                field: (*field).to_string(),
                disabled: false,
            })
            .collect();
        Self {
            section,
            controls,
            classes: BTreeSet::new(),
        }
    }

    /// Every section on the page, in page order
    #[must_use]
    pub fn page() -> Vec<Self> {
        Section::ALL.into_iter().map(Self::for_section).collect()
    }

    /// True when the locked class is set
    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.classes.contains(LOCKED_CLASS)
    }

    /// Fields whose controls accept input
    pub fn enabled_fields(&self) -> impl Iterator<Item = &str> {
        self.controls
            .iter()
            .filter(|c| !c.disabled)
            .map(|c| c.field.as_str())
    }
}

/// Applies `table` for `role` to every section
///
/// Sections are tagged, never hidden. Calling this twice with the same
/// arguments leaves the views exactly as after the first call.
pub fn apply_authorization(table: &AuthorizationTable, role: Role, sections: &mut [SectionView]) {
    for view in sections.iter_mut() {
        let editable = table.editable(role, view.section);
        for control in &mut view.controls {
            control.disabled = !editable;
        }
        let (add, drop) = if editable {
            (EDITABLE_CLASS, LOCKED_CLASS)
        } else {
            (LOCKED_CLASS, EDITABLE_CLASS)
        };
        view.classes.remove(drop);
        view.classes.insert(add.to_string());
    }
    tracing::debug!(
        "Applied authorization for {}: {:?}",
        role,
        table.sections_for(role)
    );
}
