//! End-to-end submit scenarios
//!
//! Every test drives a [`Workflow`] over an in-memory store with a fixed
//! clock, switching roles the way users hand an NCR along.

use ncr_core::{
    fields, Audience, FormValues, NcrRecord, NotificationKind, Role, Stage, WorkflowConfig,
    STATUS_CLOSED, STATUS_IN_PROGRESS,
};
use ncr_test_utils::{
    engineering_form, final_form, fixed_now, form_for, procurement_form, quality_form, role_for,
    seeded_store, store_with_role,
};
use ncr_store::{KvStore, MemoryStore, StoreError};
use ncr_workflow::validation::{MSG_EXCEEDS, MSG_MALFORMED_NUMBER, MSG_REQUIRED};
use ncr_workflow::{Navigation, SubmitError, Workflow};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::Arc;

fn workflow(role: Role) -> Workflow {
    Workflow::new(store_with_role(role), WorkflowConfig::default()).with_clock(fixed_now)
}

#[test]
fn quality_submit_creates_record_and_moves_to_engineering() {
    let wf = workflow(Role::Quality);
    let form = quality_form().with(fields::NCR_NUMBER, "NCR-2026-011");

    let outcome = wf.submit(Stage::Quality, &form).unwrap();
    assert_eq!(outcome.number.as_deref(), Some("NCR-2026-011"));
    assert_eq!(outcome.next_stage, Stage::Engineering);
    assert_eq!(
        outcome.navigation,
        Navigation::Page {
            url: "Create-NCR-Engineer.html".into()
        }
    );

    let records = wf.records().load().unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.current_stage, Some(Stage::Engineering));
    assert_eq!(record.status.as_deref(), Some(STATUS_IN_PROGRESS));
    assert_eq!(record.created_at, Some(fixed_now()));
    assert_eq!(record.quality.qty_defective, Some(3));
    assert_eq!(record.quality.marked_nonconforming, Some(true));
    assert!(record.section_is_empty(Stage::Engineering));
}

#[test]
fn quality_submit_without_number_generates_one() {
    let wf = workflow(Role::Quality);
    let first = wf.submit(Stage::Quality, &quality_form()).unwrap();
    let second = wf.submit(Stage::Quality, &quality_form()).unwrap();
    assert_eq!(first.number.as_deref(), Some("NCR-2026-011"));
    assert_eq!(second.number.as_deref(), Some("NCR-2026-012"));
    assert_eq!(second.position, 1);
}

#[test]
fn reused_number_is_rejected() {
    let wf = workflow(Role::Quality);
    let form = quality_form().with(fields::NCR_NUMBER, "NCR-2026-011");
    wf.submit(Stage::Quality, &form).unwrap();
    let err = wf.submit(Stage::Quality, &form).unwrap_err();
    assert!(matches!(err, SubmitError::DuplicateNumber(n) if n == "NCR-2026-011"));
    assert_eq!(wf.records().len().unwrap(), 1);
}

#[test]
fn engineer_submit_on_empty_store_starts_a_record() {
    let wf = workflow(Role::Engineer);
    let outcome = wf.submit(Stage::Engineering, &engineering_form()).unwrap();
    assert_eq!(outcome.position, 0);
    assert_eq!(outcome.number, None);

    let records = wf.records().load().unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert!(record.section_is_empty(Stage::Quality));
    assert!(record.section_is_empty(Stage::Procurement));
    assert!(record.section_is_empty(Stage::Final));
    assert_eq!(record.engineering.engineer_name.as_deref(), Some("R. Osei"));
    assert_eq!(record.current_stage, Some(Stage::Procurement));
}

#[test]
fn later_stage_merges_into_named_record() {
    let store = store_with_role(Role::Quality);
    let wf = Workflow::new(Arc::clone(&store), WorkflowConfig::default()).with_clock(fixed_now);
    wf.submit(Stage::Quality, &quality_form()).unwrap();
    wf.submit(Stage::Quality, &quality_form()).unwrap();

    wf.set_role(Role::Engineer).unwrap();
    let form = engineering_form().with(fields::NCR_NUMBER, "NCR-2026-011");
    let outcome = wf.submit(Stage::Engineering, &form).unwrap();
    assert_eq!(outcome.position, 0);

    let records = wf.records().load().unwrap();
    assert_eq!(records[0].current_stage, Some(Stage::Procurement));
    assert_eq!(records[0].quality.supplier.as_deref(), Some("Acme Castings"));
    assert!(records[1].section_is_empty(Stage::Engineering));
    assert_eq!(records[1].current_stage, Some(Stage::Engineering));
}

#[test]
fn later_stage_without_number_merges_into_last() {
    let mut first = NcrRecord {
        number: Some("NCR-2026-011".into()),
        current_stage: Some(Stage::Procurement),
        ..Default::default()
    };
    first.quality.supplier = Some("First".into());
    let second = NcrRecord {
        number: Some("NCR-2026-012".into()),
        current_stage: Some(Stage::Procurement),
        ..Default::default()
    };
    let store = seeded_store(vec![first, second]);
    let wf = Workflow::new(store, WorkflowConfig::default()).with_clock(fixed_now);
    wf.set_role(Role::Procurement).unwrap();

    let outcome = wf.submit(Stage::Procurement, &procurement_form()).unwrap();
    assert_eq!(outcome.number.as_deref(), Some("NCR-2026-012"));
    assert_eq!(
        outcome.navigation,
        Navigation::Page {
            url: "Create-NCR-Final.html".into()
        }
    );
    let records = wf.records().load().unwrap();
    assert!(records[0].section_is_empty(Stage::Procurement));
    assert_eq!(records[1].current_stage, Some(Stage::Final));
}

#[test]
fn unknown_number_is_not_found() {
    let store = seeded_store(vec![NcrRecord {
        number: Some("NCR-2026-011".into()),
        ..Default::default()
    }]);
    let wf = Workflow::new(store, WorkflowConfig::default());
    wf.set_role(Role::Engineer).unwrap();
    let form = engineering_form().with(fields::NCR_NUMBER, "NCR-2026-099");
    let err = wf.submit(Stage::Engineering, &form).unwrap_err();
    assert!(matches!(err, SubmitError::RecordNotFound(n) if n == "NCR-2026-099"));
}

#[test]
fn supplier_return_needs_rma_then_carrier() {
    let wf = workflow(Role::Procurement);
    let form = procurement_form().with(fields::SUPPLIER_DISPOSITION, "return");

    let err = wf.submit(Stage::Procurement, &form).unwrap_err();
    let report = err.validation().unwrap();
    assert_eq!(report.first_invalid(), Some(fields::RMA_NUMBER));
    assert_eq!(report.message(fields::RMA_NUMBER), Some(MSG_REQUIRED));

    let form = form.with(fields::RMA_NUMBER, "RMA-88");
    let err = wf.submit(Stage::Procurement, &form).unwrap_err();
    let report = err.validation().unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.first_invalid(), Some(fields::CARRIER_DETAILS));

    let form = form.with(fields::CARRIER_DETAILS, "Purolator, 2 skids");
    wf.submit(Stage::Procurement, &form).unwrap();
    assert_eq!(wf.records().len().unwrap(), 1);
}

#[test]
fn defective_above_received_blocks_submit() {
    let wf = workflow(Role::Quality);
    let form = quality_form().with(fields::QTY_DEFECTIVE, "41");
    let err = wf.submit(Stage::Quality, &form).unwrap_err();
    assert_eq!(
        err.validation().unwrap().message(fields::QTY_DEFECTIVE),
        Some(MSG_EXCEEDS)
    );
    assert!(wf.records().is_empty().unwrap());
}

#[test]
fn full_lifecycle_closes_the_record() {
    let wf = workflow(Role::Quality);
    for stage in Stage::ORDER {
        wf.set_role(role_for(stage)).unwrap();
        let form = form_for(stage);
        let outcome = wf.submit(stage, &form).unwrap();
        assert_eq!(outcome.next_stage, stage.next());
    }

    let record = wf.records().last().unwrap().unwrap();
    assert_eq!(record.current_stage, Some(Stage::Final));
    assert_eq!(record.status.as_deref(), Some(STATUS_CLOSED));
    assert!(record.is_closed());
}

#[test]
fn final_submit_opens_confirmation_modal() {
    let store = seeded_store(vec![NcrRecord {
        number: Some("NCR-2026-011".into()),
        status: Some(STATUS_IN_PROGRESS.into()),
        current_stage: Some(Stage::Final),
        ..Default::default()
    }]);
    let wf = Workflow::new(store, WorkflowConfig::default()).with_clock(fixed_now);
    wf.set_role(Role::Inspector).unwrap();

    let outcome = wf.submit(Stage::Final, &final_form()).unwrap();
    assert_eq!(
        outcome.navigation,
        Navigation::Modal {
            id: "submitModal".into(),
            redirect: "Dashboard.html".into()
        }
    );
}

#[test]
fn each_submit_notifies_the_next_role() {
    let wf = workflow(Role::Quality);
    wf.submit(Stage::Quality, &quality_form()).unwrap();

    let center = wf.notifications();
    let for_engineer = center.for_role(Role::Engineer).unwrap();
    assert_eq!(for_engineer.len(), 1);
    assert_eq!(for_engineer[0].kind, NotificationKind::QualityDone);
    assert_eq!(for_engineer[0].audience, Audience::Role(Role::Engineer));
    assert_eq!(for_engineer[0].ncr_number.as_deref(), Some("NCR-2026-011"));
    assert_eq!(center.unread_count(Role::Procurement).unwrap(), 0);
}

#[test]
fn notifications_can_be_turned_off() {
    let config = WorkflowConfig::default().with_notifications(false);
    let wf = Workflow::new(store_with_role(Role::Quality), config).with_clock(fixed_now);
    let outcome = wf.submit(Stage::Quality, &quality_form()).unwrap();
    assert_eq!(outcome.notification, None);
    assert!(wf.notifications().for_role(Role::Engineer).unwrap().is_empty());
}

#[test]
fn inspector_cannot_submit_engineering() {
    let wf = workflow(Role::Inspector);
    let err = wf
        .submit(Stage::Engineering, &engineering_form())
        .unwrap_err();
    assert!(matches!(err, SubmitError::Forbidden { .. }));
    assert!(!err.is_user_error());
}

#[test]
fn admin_may_submit_any_stage() {
    let wf = workflow(Role::Admin);
    for stage in Stage::ORDER {
        wf.submit(stage, &form_for(stage)).unwrap();
    }
    assert_eq!(wf.records().len().unwrap(), 1);
}

#[test]
fn dashboard_follows_the_record() {
    let wf = workflow(Role::Quality);
    wf.submit(Stage::Quality, &quality_form()).unwrap();

    wf.set_role(Role::Procurement).unwrap();
    assert!(wf.dashboard().unwrap().is_empty());

    wf.set_role(Role::Engineer).unwrap();
    let rows = wf.dashboard().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].supplier.as_deref(), Some("Acme Castings"));
}

#[test]
fn cancel_after_submit_offers_next_number() {
    let wf = workflow(Role::Quality);
    wf.submit(Stage::Quality, &quality_form()).unwrap();
    let fresh = wf.cancel().unwrap();
    assert_eq!(fresh.raw(fields::NCR_NUMBER), Some("NCR-2026-012"));
    assert_eq!(fresh, wf.new_form().unwrap());
}

#[test]
fn view_reports_remaining_work() {
    let wf = workflow(Role::Quality);
    wf.submit(Stage::Quality, &quality_form()).unwrap();
    wf.set_role(Role::Engineer).unwrap();

    let model = wf.view(Some("NCR-2026-011")).unwrap();
    assert_eq!(model.active_stage, Stage::Engineering);
    assert!(!model.errors.is_valid());
    assert!(model.is_editable(fields::ENGINEER_NAME));
    assert!(!model.is_editable(fields::SUPPLIER));

    let blank = wf.view(None).unwrap();
    assert!(blank.errors.is_valid());
}

#[test]
fn blank_form_still_blocks() {
    let wf = workflow(Role::Quality);
    let err = wf.submit(Stage::Quality, &FormValues::new()).unwrap_err();
    let report = err.validation().unwrap();
    assert!(!report.has_error(fields::NCR_NUMBER));
    assert_eq!(report.first_invalid(), Some(fields::DATE_REPORTED));
}

#[test]
fn submits_survive_reopening_a_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ncr-store.json");
    {
        let store: ncr_store::SharedStore = Arc::new(ncr_store::FileStore::open(&path));
        let wf = Workflow::new(store, WorkflowConfig::default()).with_clock(fixed_now);
        wf.submit(Stage::Quality, &quality_form()).unwrap();
        wf.set_role(Role::Engineer).unwrap();
    }

    let store: ncr_store::SharedStore = Arc::new(ncr_store::FileStore::open(&path));
    let wf = Workflow::new(store, WorkflowConfig::default()).with_clock(fixed_now);
    assert_eq!(wf.role().unwrap(), Role::Engineer);
    assert_eq!(wf.next_number().unwrap().to_string(), "NCR-2026-012");
    let outcome = wf.submit(Stage::Engineering, &engineering_form()).unwrap();
    assert_eq!(outcome.number.as_deref(), Some("NCR-2026-011"));
}

#[test]
fn malformed_number_is_rejected() {
    let wf = workflow(Role::Quality);
    let form = quality_form().with(fields::NCR_NUMBER, "hello");
    let err = wf.submit(Stage::Quality, &form).unwrap_err();
    let report = err.validation().unwrap();
    assert_eq!(report.first_invalid(), Some(fields::NCR_NUMBER));
    assert_eq!(report.message(fields::NCR_NUMBER), Some(MSG_MALFORMED_NUMBER));
    assert!(wf.records().is_empty().unwrap());
}

#[test]
fn reopened_ncr_is_no_longer_closed() {
    let store = seeded_store(vec![NcrRecord {
        number: Some("NCR-2026-011".into()),
        status: Some(STATUS_IN_PROGRESS.into()),
        current_stage: Some(Stage::Final),
        ..Default::default()
    }]);
    let wf = Workflow::new(store, WorkflowConfig::default()).with_clock(fixed_now);
    wf.set_role(Role::Inspector).unwrap();

    wf.submit(Stage::Final, &final_form()).unwrap();
    let record = wf.records().last().unwrap().unwrap();
    assert_eq!(record.status.as_deref(), Some(STATUS_CLOSED));

    let reopen = final_form().with(fields::NCR_CLOSED, "no");
    wf.submit(Stage::Final, &reopen).unwrap();
    let record = wf.records().last().unwrap().unwrap();
    assert!(!record.is_closed());
    assert_eq!(record.status.as_deref(), Some(STATUS_IN_PROGRESS));
}

#[test]
fn resubmitting_an_earlier_stage_moves_the_record_back() {
    let wf = workflow(Role::Admin);
    for stage in Stage::ORDER {
        wf.submit(stage, &form_for(stage)).unwrap();
    }
    let form = engineering_form().with(fields::NCR_NUMBER, "NCR-2026-011");
    let outcome = wf.submit(Stage::Engineering, &form).unwrap();
    assert_eq!(outcome.next_stage, Stage::Procurement);
    let record = wf.records().find("NCR-2026-011").unwrap().unwrap();
    assert_eq!(record.current_stage, Some(Stage::Procurement));
}

#[test]
fn unfamiliar_notifications_survive_a_submit() {
    let store = store_with_role(Role::Quality);
    store
        .set(
            "ncrNotifications",
            r#"{"notifications":[
                {"id":"n-003","type":"EMAIL_SENT_TO_ENGINEERING","title":"Email sent",
                 "createdAt":"2026-03-10T08:00:00Z","read":false,
                 "url":"View-NCR.html","audience":"Quality"},
                {"id":"n-004","type":"PART_REORDERED","title":"Reordered",
                 "createdAt":"2026-03-11T08:00:00Z","read":false,
                 "url":"View-NCR.html","audience":"Warehouse"}
            ]}"#,
        )
        .unwrap();
    let wf = Workflow::new(Arc::clone(&store), WorkflowConfig::default()).with_clock(fixed_now);

    let before = wf.notifications().for_role(Role::Quality).unwrap();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].kind, NotificationKind::EmailSentToEngineering);

    let outcome = wf.submit(Stage::Quality, &quality_form()).unwrap();
    assert_eq!(outcome.notification.as_deref(), Some("n-005"));

    let raw = store.get("ncrNotifications").unwrap().unwrap();
    let board: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let ids: Vec<_> = board["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["n-003", "n-004", "n-005"]);
    assert_eq!(board["notifications"][1]["audience"], "Warehouse");
    assert_eq!(board["notifications"][1]["type"], "OTHER");
}

#[test]
fn records_with_text_quantities_survive_a_submit() {
    let store = store_with_role(Role::Quality);
    store
        .set(
            "ncrList",
            r#"[{"number":"NCR-2025-014","qtyReceived":"40","qtyDefective":"3"}]"#,
        )
        .unwrap();
    let wf = Workflow::new(store, WorkflowConfig::default()).with_clock(fixed_now);

    wf.submit(Stage::Quality, &quality_form()).unwrap();
    let records = wf.records().load().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].number.as_deref(), Some("NCR-2025-014"));
    assert_eq!(records[0].quality.qty_received, Some(40));
}

#[test]
fn unreadable_record_list_is_left_alone() {
    let store = store_with_role(Role::Quality);
    store.set("ncrList", "not a list").unwrap();
    let wf = Workflow::new(Arc::clone(&store), WorkflowConfig::default()).with_clock(fixed_now);

    assert!(wf.records().is_empty().unwrap());
    let err = wf.submit(Stage::Quality, &quality_form()).unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Store(StoreError::Unreadable { ref key, .. }) if key == "ncrList"
    ));
    assert_eq!(store.get("ncrList").unwrap().as_deref(), Some("not a list"));
}

/// Memory store whose writes to one key always fail
#[derive(Debug, Default)]
struct FailingKey {
    inner: MemoryStore,
    key: &'static str,
}

impl KvStore for FailingKey {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if key == self.key {
            return Err(StoreError::Io {
                path: PathBuf::from("ncr-store.json"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        self.inner.set(key, value)
    }
}

#[test]
fn failed_notification_does_not_undo_the_submit() {
    let store = Arc::new(FailingKey {
        inner: MemoryStore::new(),
        key: "ncrNotifications",
    });
    let wf = Workflow::new(store, WorkflowConfig::default()).with_clock(fixed_now);
    wf.set_role(Role::Quality).unwrap();

    let outcome = wf.submit(Stage::Quality, &quality_form()).unwrap();
    assert_eq!(outcome.number.as_deref(), Some("NCR-2026-011"));
    assert_eq!(outcome.notification, None);
    assert!(outcome.notification_error.unwrap().contains("disk full"));
    assert_eq!(wf.records().len().unwrap(), 1);

    let next = wf.submit(Stage::Quality, &quality_form()).unwrap();
    assert_eq!(next.number.as_deref(), Some("NCR-2026-012"));
}
