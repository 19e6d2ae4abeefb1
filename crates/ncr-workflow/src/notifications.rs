//! Notification center
//!
//! Role-filtered view over the persisted notification board, plus the
//! hand-off message emitted after each stage submit.

use chrono::{DateTime, Utc};
use ncr_core::{Audience, Notification, NotificationKind, Role, Stage, StagePages};
use ncr_store::{NotificationStore, StoreError};

/// Badge text above this count is capped
pub const BADGE_CAP: usize = 99;

/// Notifications for the current role
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    store: NotificationStore,
}

impl NotificationCenter {
    #[must_use]
    pub fn new(store: NotificationStore) -> Self {
        Self { store }
    }

    /// Entries addressed to `role` or to everyone, newest first
    ///
    /// # Errors
    /// Backend failures.
    pub fn for_role(&self, role: Role) -> Result<Vec<Notification>, StoreError> {
        let mut visible: Vec<_> = self
            .store
            .load()?
            .notifications
            .into_iter()
            .filter(|n| n.audience.includes(role))
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible)
    }

    /// Unread entries visible to `role`
    ///
    /// # Errors
    /// Backend failures.
    pub fn unread_count(&self, role: Role) -> Result<usize, StoreError> {
        Ok(self.for_role(role)?.iter().filter(|n| !n.read).count())
    }

    /// Badge text, hidden at zero
    #[must_use]
    pub fn badge(count: usize) -> Option<String> {
        match count {
            0 => None,
            n if n > BADGE_CAP => Some(format!("{BADGE_CAP}+")),
            n => Some(n.to_string()),
        }
    }

    /// Marks one entry read. Returns `false` for an unknown id.
    ///
    /// # Errors
    /// Backend failures.
    pub fn mark_read(&self, id: &str) -> Result<bool, StoreError> {
        self.store.update(|board| {
            match board.notifications.iter_mut().find(|n| n.id == id) {
                Some(n) => {
                    n.read = true;
                    true
                }
                None => false,
            }
        })
    }

    /// Marks every entry visible to `role` read, returning how many changed
    ///
    /// # Errors
    /// Backend failures.
    pub fn mark_all_read(&self, role: Role) -> Result<usize, StoreError> {
        let changed = self.store.update(|board| {
            let mut changed = 0;
            for n in board
                .notifications
                .iter_mut()
                .filter(|n| n.audience.includes(role) && !n.read)
            {
                n.read = true;
                changed += 1;
            }
            changed
        })?;
        tracing::debug!("Marked {} notifications read for {}", changed, role);
        Ok(changed)
    }

    /// Stores a new entry, assigning the next free id when `id` is empty
    ///
    /// # Errors
    /// Backend failures.
    pub fn push(&self, mut notification: Notification) -> Result<String, StoreError> {
        self.store.update(|board| {
            if notification.id.is_empty() {
                notification.id = board.next_id();
            }
            let id = notification.id.clone();
            board.notifications.push(notification);
            id
        })
    }

    /// Tells the next stage's role that `number` is waiting
    ///
    /// # Errors
    /// Backend failures.
    pub fn notify_submitted(
        &self,
        stage: Stage,
        number: Option<&str>,
        pages: &StagePages,
        now: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        let notification = handoff(stage, number, pages, now);
        let audience = notification.audience.clone();
        let id = self.push(notification)?;
        tracing::info!("Notified {} ({})", audience, id);
        Ok(id)
    }
}

/// Role that acts after `stage` is submitted
#[must_use]
pub fn next_audience(stage: Stage) -> Audience {
    match stage {
        Stage::Quality => Audience::Role(Role::Engineer),
        Stage::Engineering => Audience::Role(Role::Procurement),
        Stage::Procurement => Audience::Role(Role::Inspector),
        Stage::Final => Audience::Role(Role::Quality),
    }
}

fn handoff(
    stage: Stage,
    number: Option<&str>,
    pages: &StagePages,
    now: DateTime<Utc>,
) -> Notification {
    let label = number.unwrap_or("NCR");
    let (title, message) = match stage {
        Stage::Final => (
            format!("{label} final review submitted"),
            "Re-inspection recorded; review the closed report.".to_string(),
        ),
        _ => (
            format!("{label} {} completed", stage.label()),
            format!("Ready for {} review.", stage.next().label()),
        ),
    };
    let target = if stage == Stage::Final {
        stage
    } else {
        stage.next()
    };
    let url = match number {
        Some(n) => format!("{}?ncr={n}&section={}", pages.view, target.section().element_id()),
        None => pages.for_stage(target).to_string(),
    };
    Notification {
        id: String::new(),
        ncr_number: number.map(str::to_string),
        kind: NotificationKind::for_submitted(stage),
        title,
        message: Some(message),
        created_at: now,
        read: false,
        url,
        audience: next_audience(stage),
    }
}
