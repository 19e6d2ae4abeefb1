//! Role → section allow-list
//!
//! This is the single table deciding which sections a role may edit. Pages
//! never carry their own copy; deployments that want a different split (for
//! example giving Quality the inspector section too) override it through
//! [`crate::WorkflowConfig`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::role::Role;
use crate::stage::Section;

/// One row of the table as it appears in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    /// Role the row applies to
    pub role: Role,
    /// Sections the role may edit
    pub sections: Vec<Section>,
}

/// Static allow-list of editable sections per role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RoleGrant>", into = "Vec<RoleGrant>")]
pub struct AuthorizationTable {
    grants: BTreeMap<Role, BTreeSet<Section>>,
}

impl AuthorizationTable {
    /// Table with no grants at all
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            grants: BTreeMap::new(),
        }
    }

    /// Replace a role's grant, builder style
    #[must_use]
    pub fn with_grant(mut self, role: Role, sections: &[Section]) -> Self {
        self.grants.insert(role, sections.iter().copied().collect());
        self
    }

    /// Whether `role` may edit `section`. Roles without a row edit nothing.
    #[inline]
    #[must_use]
    pub fn editable(&self, role: Role, section: Section) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|sections| sections.contains(&section))
    }

    /// Sections `role` may edit, in page order
    #[must_use]
    pub fn sections_for(&self, role: Role) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| self.editable(role, *s))
            .collect()
    }
}

impl Default for AuthorizationTable {
    fn default() -> Self {
        Self::empty()
            .with_grant(Role::Quality, &[Section::Quality])
            .with_grant(Role::Engineer, &[Section::Engineering])
            .with_grant(Role::Procurement, &[Section::Procurement])
            .with_grant(Role::Inspector, &[Section::Inspector])
            .with_grant(Role::Admin, &Section::ALL)
    }
}

impl From<Vec<RoleGrant>> for AuthorizationTable {
    fn from(rows: Vec<RoleGrant>) -> Self {
        rows.into_iter().fold(Self::empty(), |table, row| {
            table.with_grant(row.role, &row.sections)
        })
    }
}

impl From<AuthorizationTable> for Vec<RoleGrant> {
    fn from(table: AuthorizationTable) -> Self {
        table
            .grants
            .into_iter()
            .map(|(role, sections)| RoleGrant {
                role,
                sections: sections.into_iter().collect(),
            })
            .collect()
    }
}
