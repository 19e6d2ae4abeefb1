//! Notification panel entries
//!
//! Each stage submit tells the next stage's role that a record is waiting.
//! Entries are addressed to one role or to everybody.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::role::{parse_label, Role};
use crate::stage::Stage;

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// Quality inspection finished, engineering can start
    QualityDone,
    /// Engineering disposition recorded
    EngineeringDone,
    /// Procurement follow-up recorded
    ProcurementDone,
    /// Final review submitted
    NcrClosed,
    /// An email went out to engineering
    EmailSentToEngineering,
    /// Any kind this version does not know
    #[serde(other)]
    Other,
}

impl NotificationKind {
    /// Kind emitted when `stage` is submitted
    #[must_use]
    pub fn for_submitted(stage: Stage) -> Self {
        match stage {
            Stage::Quality => NotificationKind::QualityDone,
            Stage::Engineering => NotificationKind::EngineeringDone,
            Stage::Procurement => NotificationKind::ProcurementDone,
            Stage::Final => NotificationKind::NcrClosed,
        }
    }

    /// Icon name used by the panel's icon library
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::QualityDone => "check-circle",
            NotificationKind::EngineeringDone => "wrench",
            NotificationKind::ProcurementDone => "truck",
            NotificationKind::NcrClosed => "archive",
            NotificationKind::EmailSentToEngineering => "send",
            NotificationKind::Other => "bell",
        }
    }
}

/// Who sees a notification
///
/// A label that names no role is kept verbatim so the entry survives a
/// rewrite of the board; nobody sees it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Audience {
    /// Every role
    All,
    /// One role
    Role(Role),
    /// Unrecognized label
    Unknown(String),
}

impl Audience {
    /// Whether `role` sees entries for this audience
    #[inline]
    #[must_use]
    pub fn includes(&self, role: Role) -> bool {
        match self {
            Audience::All => true,
            Audience::Role(r) => *r == role,
            Audience::Unknown(_) => false,
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Audience::All => f.write_str("All"),
            Audience::Role(r) => f.write_str(r.label()),
            Audience::Unknown(label) => f.write_str(label),
        }
    }
}

impl From<String> for Audience {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("all") {
            return Audience::All;
        }
        match parse_label(&value) {
            Ok(role) => Audience::Role(role),
            Err(_) => Audience::Unknown(value),
        }
    }
}

impl From<Audience> for String {
    fn from(value: Audience) -> Self {
        value.to_string()
    }
}

/// A single panel entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ncr_number: Option<String>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    pub url: String,
    pub audience: Audience,
}

/// Everything persisted under the notifications key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationBoard {
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl NotificationBoard {
    /// Next free `n-NNN` id
    #[must_use]
    pub fn next_id(&self) -> String {
        let highest = self
            .notifications
            .iter()
            .filter_map(|n| n.id.strip_prefix("n-")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("n-{:03}", highest + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audience_parses_legacy_labels() {
        let audience: Audience = serde_json::from_str("\"Engineering\"").unwrap();
        assert_eq!(audience, Audience::Role(Role::Engineer));
        let all: Audience = serde_json::from_str("\"All\"").unwrap();
        assert!(all.includes(Role::Inspector));
        let nobody: Audience = serde_json::from_str("\"Nobody\"").unwrap();
        assert_eq!(nobody, Audience::Unknown("Nobody".into()));
        assert!(!nobody.includes(Role::Admin));
        assert_eq!(serde_json::to_string(&nobody).unwrap(), "\"Nobody\"");
    }

    #[test]
    fn unknown_kind_reads_as_other() {
        let kind: NotificationKind = serde_json::from_str("\"PART_REORDERED\"").unwrap();
        assert_eq!(kind, NotificationKind::Other);
        let email: NotificationKind =
            serde_json::from_str("\"EMAIL_SENT_TO_ENGINEERING\"").unwrap();
        assert_eq!(email.icon(), "send");
    }

    #[test]
    fn ids_continue_after_highest() {
        let mut board = NotificationBoard::default();
        assert_eq!(board.next_id(), "n-001");
        board.notifications.push(Notification {
            id: "n-007".into(),
            ncr_number: None,
            kind: NotificationKind::Other,
            title: "t".into(),
            message: None,
            created_at: Utc::now(),
            read: false,
            url: "view.html".into(),
            audience: Audience::All,
        });
        assert_eq!(board.next_id(), "n-008");
    }
}
