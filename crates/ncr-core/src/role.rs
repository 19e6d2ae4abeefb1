//! Actor roles
//!
//! A role is the acting user's functional identity. It gates which workflow
//! section is editable and which stage the tab controller locks onto.
//! Stored labels may come from older builds, so every read goes through
//! [`normalize`] before parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Canonical actor roles
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Role {
    /// Quality representative, opens new NCRs
    #[default]
    Quality,
    /// Engineer, records the disposition
    Engineer,
    /// Procurement / operations manager
    Procurement,
    /// Inspector, performs the final review
    Inspector,
    /// Superuser, edits every section
    Admin,
}

impl Role {
    /// Every canonical role, in workflow order
    pub const ALL: [Role; 5] = [
        Role::Quality,
        Role::Engineer,
        Role::Procurement,
        Role::Inspector,
        Role::Admin,
    ];

    /// Canonical storage label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Role::Quality => "Quality",
            Role::Engineer => "Engineer",
            Role::Procurement => "Procurement",
            Role::Inspector => "Inspector",
            Role::Admin => "Admin",
        }
    }

    /// Human readable name shown in page titles and the account label
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Quality => "Quality Representative",
            Role::Engineer => "Engineer",
            Role::Procurement => "Procurement/Operations",
            Role::Inspector => "Inspector",
            Role::Admin => "Administrator",
        }
    }

    /// Coarse page-level permissions
    #[must_use]
    pub fn permissions(&self) -> Permissions {
        let creates = matches!(self, Role::Quality | Role::Admin);
        Permissions {
            can_create_ncr: creates,
            can_view_dashboard: true,
            can_edit_ncr: true,
        }
    }

    /// Roles that see every section and are never locked to a single tab
    #[inline]
    #[must_use]
    pub fn is_superuser(&self) -> bool {
        matches!(self, Role::Quality | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = ParseError;

    /// Parses a canonical label only. Run [`normalize`] first for stored input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.label() == s)
            .ok_or_else(|| ParseError::UnknownRole(s.to_string()))
    }
}

/// Page-level permissions attached to a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    /// May open a brand new NCR (Quality stage submit)
    pub can_create_ncr: bool,
    /// May open the dashboard
    pub can_view_dashboard: bool,
    /// May edit an existing NCR's own section
    pub can_edit_ncr: bool,
}

/// Maps known legacy labels onto canonical ones.
///
/// Matching is case-insensitive and ignores surrounding whitespace. Labels that
/// match nothing are returned unchanged, so the result is not guaranteed to
/// parse as a [`Role`].
#[must_use]
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let canonical = match trimmed.to_ascii_lowercase().as_str() {
        "quality" | "quality rep" | "quality representative" | "qa" => Some(Role::Quality),
        "engineer" | "engineering" => Some(Role::Engineer),
        "procurement"
        | "purchasing"
        | "procurement/purchasing"
        | "procurement/operations"
        | "operations"
        | "operations manager"
        | "operational manager" => Some(Role::Procurement),
        "inspector" | "quality inspector" | "final review" | "final-review" => {
            Some(Role::Inspector)
        }
        "admin" | "administrator" => Some(Role::Admin),
        _ => None,
    };

    match canonical {
        Some(role) => role.label().to_string(),
        None => trimmed.to_string(),
    }
}

/// Normalizes then parses a stored label
///
/// # Errors
/// Returns [`ParseError::UnknownRole`] when the label is not a known synonym.
pub fn parse_label(raw: &str) -> Result<Role, ParseError> {
    normalize(raw).parse()
}
