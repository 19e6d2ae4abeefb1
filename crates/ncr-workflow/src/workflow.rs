//! Workflow context and submit handlers
//!
//! A [`Workflow`] owns the configuration and the three stores that live in
//! one key/value backend. Every operation is a synchronous
//! read-modify-write; nothing is cached between calls.
//!
//! Submitting a stage:
//! 1. the current role must be allowed to edit the stage's section
//! 2. the form must validate
//! 3. Quality appends a new record, later stages merge into an existing one
//! 4. the record advances one stage and the next role is notified
//! 5. the caller is told where to navigate
//!
//! The record write is the commit point. A failed notification after it is
//! logged and reported in the outcome, never turned into a failed submit.
//!
//! Resubmitting an earlier stage on a record that has moved past it sends
//! the record back to that stage's successor.

use chrono::{DateTime, Datelike, Utc};
use ncr_core::{
    fields, generate_ncr_number, FormValues, NcrNumber, NcrRecord, Role, Stage, StageFields,
    WorkflowConfig, STATUS_CLOSED,
};
use ncr_store::{NotificationStore, RecordStore, RoleContext, SharedStore, StoreError};
use serde::Serialize;
use std::borrow::Cow;

use crate::authorization::{apply_authorization, SectionView};
use crate::dashboard::{dashboard_rows, DashboardRow};
use crate::error::SubmitError;
use crate::notifications::NotificationCenter;
use crate::validation::validate_stage;
use crate::view::{view_model, ViewModel};

/// Where the page goes after a successful submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Navigation {
    /// Load another page
    Page { url: String },
    /// Open a confirmation modal that later redirects
    Modal { id: String, redirect: String },
}

/// Result of an accepted submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub number: Option<String>,
    /// Stage that was submitted
    pub stage: Stage,
    /// Stage the record now waits on
    pub next_stage: Stage,
    /// Index of the record in the list
    pub position: usize,
    pub navigation: Navigation,
    /// Id of the hand-off notification, when one was emitted
    pub notification: Option<String>,
    /// Why the hand-off notification could not be stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_error: Option<String>,
}

/// Application context over one key/value backend
#[derive(Debug, Clone)]
pub struct Workflow {
    config: WorkflowConfig,
    records: RecordStore,
    role: RoleContext,
    notifications: NotificationCenter,
    clock: fn() -> DateTime<Utc>,
}

impl Workflow {
    /// Context over `store` using the keys in `config`
    #[must_use]
    pub fn new(store: SharedStore, config: WorkflowConfig) -> Self {
        let keys = &config.storage;
        let records = RecordStore::new(store.clone(), keys.records.clone());
        let role = RoleContext::new(store.clone(), keys.role.clone());
        let notifications =
            NotificationCenter::new(NotificationStore::new(store, keys.notifications.clone()));
        Self {
            config,
            records,
            role,
            notifications,
            clock: Utc::now,
        }
    }

    /// Replace the time source
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    #[inline]
    #[must_use]
    pub fn role_context(&self) -> &RoleContext {
        &self.role
    }

    #[inline]
    #[must_use]
    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Current role
    ///
    /// # Errors
    /// Backend failures.
    pub fn role(&self) -> Result<Role, StoreError> {
        self.role.role()
    }

    /// Persist a new role
    ///
    /// # Errors
    /// Backend failures.
    pub fn set_role(&self, role: Role) -> Result<(), StoreError> {
        self.role.set_role(role)
    }

    /// Number the next new record would get
    ///
    /// # Errors
    /// Backend failures.
    pub fn next_number(&self) -> Result<NcrNumber, StoreError> {
        let records = self.records.load()?;
        let year = (self.clock)().year();
        Ok(generate_ncr_number(
            records.iter().map(|r| r.number.as_deref()),
            year,
        ))
    }

    /// Blank Quality form, pre-filled with a fresh number and the default status
    ///
    /// # Errors
    /// Backend failures.
    pub fn new_form(&self) -> Result<FormValues, StoreError> {
        Ok(FormValues::new()
            .with(fields::NCR_NUMBER, self.next_number()?.to_string())
            .with(fields::STATUS, self.config.default_status.clone()))
    }

    /// Reset the Quality form; the number is regenerated
    ///
    /// # Errors
    /// Backend failures.
    pub fn cancel(&self) -> Result<FormValues, StoreError> {
        let form = self.new_form()?;
        tracing::debug!("Form reset, next number {:?}", form.raw(fields::NCR_NUMBER));
        Ok(form)
    }

    /// Sections of the page with the current role's authorization applied
    ///
    /// # Errors
    /// Backend failures.
    pub fn authorized_page(&self) -> Result<Vec<SectionView>, StoreError> {
        let role = self.role()?;
        let mut page = SectionView::page();
        apply_authorization(&self.config.authorization, role, &mut page);
        Ok(page)
    }

    /// View-model of the record numbered `number`, or of a blank page
    ///
    /// # Errors
    /// Backend failures.
    pub fn view(&self, number: Option<&str>) -> Result<ViewModel, StoreError> {
        let role = self.role()?;
        let record = match number {
            Some(n) => self.records.find(n)?,
            None => None,
        };
        Ok(view_model(record.as_ref(), role, &self.config.authorization))
    }

    /// Dashboard for the current role
    ///
    /// # Errors
    /// Backend failures.
    pub fn dashboard(&self) -> Result<Vec<DashboardRow>, StoreError> {
        let role = self.role()?;
        let records = self.records.load()?;
        Ok(dashboard_rows(&records, role, &self.config.pages))
    }

    /// Submits one stage's form
    ///
    /// Nothing is written unless the submit is accepted.
    ///
    /// # Errors
    /// See [`SubmitError`].
    pub fn submit(&self, stage: Stage, form: &FormValues) -> Result<SubmitOutcome, SubmitError> {
        let role = self.role()?;
        self.authorize(role, stage)?;

        // A new record gets a generated number when the form carries none.
        let form = if stage == Stage::Quality && form.is_blank(fields::NCR_NUMBER) {
            Cow::Owned(
                form.clone()
                    .with(fields::NCR_NUMBER, self.next_number()?.to_string()),
            )
        } else {
            Cow::Borrowed(form)
        };
        let form = form.as_ref();

        let report = validate_stage(stage, form);
        if !report.is_valid() {
            tracing::info!(
                "{} submit blocked: {} field(s) invalid, first {:?}",
                stage,
                report.len(),
                report.first_invalid()
            );
            return Err(SubmitError::Validation(report));
        }

        let now = (self.clock)();
        let incoming = StageFields::from_form(stage, form);
        let (position, number) = match stage {
            Stage::Quality => self.append_new(form, incoming, now)?,
            _ => self.merge_into(stage, form, incoming, now)?,
        };
        let next_stage = stage.next();

        let (notification, notification_error) = if self.config.emit_notifications {
            match self.notifications.notify_submitted(
                stage,
                number.as_deref(),
                &self.config.pages,
                now,
            ) {
                Ok(id) => (Some(id), None),
                Err(e) => {
                    tracing::warn!("{} saved for {:?} but not announced: {}", stage, number, e);
                    (None, Some(e.to_string()))
                }
            }
        } else {
            (None, None)
        };

        tracing::info!(
            "{} submitted {} for {:?}; next {}",
            role,
            stage,
            number,
            next_stage
        );
        Ok(SubmitOutcome {
            number,
            stage,
            next_stage,
            position,
            navigation: self.navigation_after(stage),
            notification,
            notification_error,
        })
    }

    fn authorize(&self, role: Role, stage: Stage) -> Result<(), SubmitError> {
        let may_edit = self.config.authorization.editable(role, stage.section());
        let may_create = stage != Stage::Quality || role.permissions().can_create_ncr;
        if may_edit && may_create {
            Ok(())
        } else {
            tracing::warn!("{} tried to submit {}", role, stage);
            Err(SubmitError::Forbidden { role, stage })
        }
    }

    fn append_new(
        &self,
        form: &FormValues,
        incoming: StageFields,
        now: DateTime<Utc>,
    ) -> Result<(usize, Option<String>), SubmitError> {
        let number = match form.text(fields::NCR_NUMBER) {
            Some(n) => n,
            None => self.next_number()?.to_string(),
        };
        let status = form
            .text(fields::STATUS)
            .unwrap_or_else(|| self.config.default_status.clone());

        let mut record = NcrRecord {
            number: Some(number.clone()),
            created_at: Some(now),
            status: Some(status),
            current_stage: Some(Stage::Quality.next()),
            ..Default::default()
        };
        record.merge_stage(incoming);

        let position = self.records.update(|list| {
            if list.iter().any(|r| r.number.as_deref() == Some(number.as_str())) {
                return None;
            }
            list.push(record);
            Some(list.len() - 1)
        })?;
        match position {
            Some(position) => Ok((position, Some(number))),
            None => Err(SubmitError::DuplicateNumber(number)),
        }
    }

    fn merge_into(
        &self,
        stage: Stage,
        form: &FormValues,
        incoming: StageFields,
        now: DateTime<Utc>,
    ) -> Result<(usize, Option<String>), SubmitError> {
        let wanted = form.text(fields::NCR_NUMBER);
        let default_status = &self.config.default_status;
        let merged = self.records.update(|list| {
            if list.is_empty() {
                let mut record = NcrRecord {
                    number: wanted.clone(),
                    created_at: Some(now),
                    current_stage: Some(stage.next()),
                    ..Default::default()
                };
                record.merge_stage(incoming);
                close_if_done(&mut record, stage, default_status);
                let number = record.number.clone();
                list.push(record);
                tracing::debug!("Empty store, started a record at {}", stage);
                return Some((0, number));
            }
            let position = match &wanted {
                Some(n) => list.iter().position(|r| r.number.as_deref() == Some(n.as_str()))?,
                None => list.len() - 1,
            };
            let record = &mut list[position];
            if record.stage() > stage.next() {
                tracing::warn!(
                    "{} resubmitted on {:?}, moving it back from {}",
                    stage,
                    record.number,
                    record.stage()
                );
            }
            record.merge_stage(incoming);
            record.current_stage = Some(stage.next());
            close_if_done(record, stage, default_status);
            tracing::debug!("Merged {} into record {}", stage, position);
            Some((position, record.number.clone()))
        })?;

        merged.ok_or_else(|| SubmitError::RecordNotFound(wanted.unwrap_or_default()))
    }

    fn navigation_after(&self, stage: Stage) -> Navigation {
        let pages = &self.config.pages;
        match stage {
            Stage::Final => Navigation::Modal {
                id: pages.confirmation_modal.clone(),
                redirect: pages.dashboard.clone(),
            },
            _ => Navigation::Page {
                url: pages.for_stage(stage.next()).to_string(),
            },
        }
    }
}

/// Final review settles the status; other stages keep whatever is there
///
/// A record reopened by a later review loses its closed status.
fn close_if_done(record: &mut NcrRecord, stage: Stage, default_status: &str) {
    if stage != Stage::Final {
        return;
    }
    if record.is_closed() {
        record.status = Some(STATUS_CLOSED.to_string());
    } else if record.status.as_deref().map_or(true, |s| s == STATUS_CLOSED) {
        record.status = Some(default_status.to_string());
    }
}
