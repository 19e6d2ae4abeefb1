//! Workflow stages and the form sections they own
//!
//! The stage sequence is fixed and linear:
//! Quality → Engineering → Procurement → Final. Each stage owns exactly one
//! role-tagged form section.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::role::Role;

/// A phase of the review workflow
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Stage {
    /// Quality inspection, opens the NCR
    #[default]
    Quality,
    /// Engineering disposition
    Engineering,
    /// Procurement / operations follow-up
    Procurement,
    /// Inspector re-inspection and closure
    Final,
}

impl Stage {
    /// Stages in workflow order
    pub const ORDER: [Stage; 4] = [
        Stage::Quality,
        Stage::Engineering,
        Stage::Procurement,
        Stage::Final,
    ];

    /// Label persisted in `currentStage`
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Quality => "Quality",
            Stage::Engineering => "Engineering",
            Stage::Procurement => "Procurement",
            Stage::Final => "Final",
        }
    }

    /// Stage that follows this one. `Final` has no successor and maps to itself.
    #[inline]
    #[must_use]
    pub fn next(&self) -> Stage {
        match self {
            Stage::Quality => Stage::Engineering,
            Stage::Engineering => Stage::Procurement,
            Stage::Procurement | Stage::Final => Stage::Final,
        }
    }

    /// Stage immediately before this one
    #[must_use]
    pub fn previous(&self) -> Option<Stage> {
        match self {
            Stage::Quality => None,
            Stage::Engineering => Some(Stage::Quality),
            Stage::Procurement => Some(Stage::Engineering),
            Stage::Final => Some(Stage::Procurement),
        }
    }

    /// Form section this stage edits
    #[inline]
    #[must_use]
    pub fn section(&self) -> Section {
        match self {
            Stage::Quality => Section::Quality,
            Stage::Engineering => Section::Engineering,
            Stage::Procurement => Section::Procurement,
            Stage::Final => Section::Inspector,
        }
    }

    /// Stage a role works on. Admin lands on Quality.
    #[must_use]
    pub fn for_role(role: Role) -> Stage {
        match role {
            Role::Quality | Role::Admin => Stage::Quality,
            Role::Engineer => Stage::Engineering,
            Role::Procurement => Stage::Procurement,
            Role::Inspector => Stage::Final,
        }
    }

    /// Position in [`Stage::ORDER`]
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Stage::Quality => 0,
            Stage::Engineering => 1,
            Stage::Procurement => 2,
            Stage::Final => 3,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Stage {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quality" => Ok(Stage::Quality),
            "engineering" => Ok(Stage::Engineering),
            "procurement" | "purchasing" | "operations" => Ok(Stage::Procurement),
            "final" | "final-review" | "inspector" => Ok(Stage::Final),
            _ => Err(ParseError::UnknownStage(s.to_string())),
        }
    }
}

/// Role-tagged form section
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Quality representative's section
    Quality,
    /// Engineering section
    Engineering,
    /// Procurement / operations section
    Procurement,
    /// Inspector / final review section
    Inspector,
}

impl Section {
    /// Sections in page order
    pub const ALL: [Section; 4] = [
        Section::Quality,
        Section::Engineering,
        Section::Procurement,
        Section::Inspector,
    ];

    /// Element id of the section on the view page
    #[must_use]
    pub fn element_id(&self) -> &'static str {
        match self {
            Section::Quality => "sec-quality",
            Section::Engineering => "sec-engineering",
            Section::Procurement => "sec-purchasing",
            Section::Inspector => "sec-final",
        }
    }

    /// Reverse of [`Section::element_id`]
    #[must_use]
    pub fn from_element_id(id: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.element_id() == id)
    }

    /// Stage that owns this section
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Section::Quality => Stage::Quality,
            Section::Engineering => Stage::Engineering,
            Section::Procurement => Stage::Procurement,
            Section::Inspector => Stage::Final,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}
