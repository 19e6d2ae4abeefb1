//! View-model
//!
//! What a page shows for a record and a role, computed without a page: which
//! sections are visible, which fields accept input, which stage is active
//! and which of the record's own values still fail validation.

use ncr_core::{stage_fields, AuthorizationTable, NcrRecord, Role, Section, Stage};
use serde::Serialize;

use crate::validation::{validate_stage, ValidationReport};

/// Sections a role can see
///
/// Engineers see up to engineering, procurement up to procurement, everyone
/// else sees the whole report.
#[must_use]
pub fn visible_sections(role: Role) -> &'static [Section] {
    match role {
        Role::Engineer => &[Section::Quality, Section::Engineering],
        Role::Procurement => &[Section::Quality, Section::Engineering, Section::Procurement],
        Role::Quality | Role::Inspector | Role::Admin => &Section::ALL,
    }
}

/// Per-section state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionState {
    pub section: Section,
    pub visible: bool,
    pub editable: bool,
    pub fields: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub role: Role,
    pub active_stage: Stage,
    pub sections: Vec<SectionState>,
    pub visible_fields: Vec<&'static str>,
    pub editable_fields: Vec<&'static str>,
    pub errors: ValidationReport,
}

impl ViewModel {
    /// State of one section
    #[must_use]
    pub fn section(&self, section: Section) -> Option<&SectionState> {
        self.sections.iter().find(|s| s.section == section)
    }

    #[must_use]
    pub fn is_editable(&self, field: &str) -> bool {
        self.editable_fields.contains(&field)
    }
}

/// Builds the view-model for `role` looking at `record`
///
/// Without a record nothing has been entered yet, so there are no errors.
#[must_use]
pub fn view_model(record: Option<&NcrRecord>, role: Role, table: &AuthorizationTable) -> ViewModel {
    let visible = visible_sections(role);
    let sections: Vec<SectionState> = Section::ALL
        .into_iter()
        .map(|section| {
            let visible = visible.contains(&section);
            SectionState {
                section,
                visible,
                editable: visible && table.editable(role, section),
                fields: stage_fields(section.stage()),
            }
        })
        .collect();

    let collect = |pick: fn(&SectionState) -> bool| -> Vec<&'static str> {
        sections
            .iter()
            .filter(|s| pick(s))
            .flat_map(|s| s.fields.iter().copied())
            .collect()
    };
    let visible_fields = collect(|s| s.visible);
    let editable_fields = collect(|s| s.editable);

    let errors = record.map_or_else(ValidationReport::new, |record| {
        let stage = record.stage();
        validate_stage(stage, &record.to_form(stage))
    });

    ViewModel {
        role,
        active_stage: Stage::for_role(role),
        sections,
        visible_fields,
        editable_fields,
        errors,
    }
}
