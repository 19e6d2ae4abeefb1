//! Testing utilities for the NCR workspace
//!
//! Shared fixtures: complete, valid forms for each stage, a fixed clock and
//! pre-seeded stores.

#![allow(missing_docs)]

use chrono::{DateTime, TimeZone, Utc};
use ncr_core::{fields, FormValues, NcrRecord, Role, Stage, StorageKeys};
use ncr_store::{MemoryStore, RecordStore, RoleContext, SharedStore};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
}

/// Quality form with every required field, 3 of 40 defective
pub fn quality_form() -> FormValues {
    FormValues::new()
        .with(fields::DATE_REPORTED, "2026-03-14")
        .with(fields::PROCESS, "supplier")
        .with(fields::SUPPLIER, "Acme Castings")
        .with(fields::PO_OR_PROD, "PO-4471")
        .with(fields::SALES_ORDER, "SO-2210")
        .with(fields::ITEM_DESCRIPTION, "Pump housing, cast aluminium")
        .with(fields::QTY_RECEIVED, "40")
        .with(fields::QTY_DEFECTIVE, "3")
        .with(fields::DEFECT_DESCRIPTION, "Porosity on sealing face")
        .with(fields::MARKED_NONCONFORMING, "yes")
        .with(fields::REPORTED_BY, "J. Tremblay")
}

pub fn engineering_form() -> FormValues {
    FormValues::new()
        .with(fields::DISPOSITION, "repair")
        .with(fields::DISPOSITION_DETAILS, "Impregnate and re-test")
        .with(fields::CUSTOMER_NOTIFICATION, "no")
        .with(fields::DRAWING_UPDATE, "no")
        .with(fields::ENGINEER_NAME, "R. Osei")
        .with(fields::ENGINEER_DATE, "2026-03-16")
}

/// Procurement form disposing on site, no CAR, no follow-up
pub fn procurement_form() -> FormValues {
    FormValues::new()
        .with(fields::PURCHASE_DECISION, "Rework in house")
        .with(fields::CAR_RAISED, "no")
        .with(fields::FOLLOW_UP_REQUIRED, "no")
        .with(fields::SUPPLIER_DISPOSITION, "dispose")
        .with(fields::OPERATIONS_MANAGER, "L. Nguyen")
        .with(fields::OPERATIONS_DATE, "2026-03-18")
}

/// Final review form that closes the NCR
pub fn final_form() -> FormValues {
    FormValues::new()
        .with(fields::REINSPECTION_ACCEPTABLE, "yes")
        .with(fields::INSPECTOR_NAME, "M. Duarte")
        .with(fields::INSPECTOR_DATE, "2026-03-20")
        .with(fields::NCR_CLOSED, "yes")
        .with(fields::QUALITY_DEPT_NAME, "J. Tremblay")
        .with(fields::QUALITY_DEPT_DATE, "2026-03-21")
}

/// Valid form for any stage
pub fn form_for(stage: Stage) -> FormValues {
    match stage {
        Stage::Quality => quality_form(),
        Stage::Engineering => engineering_form(),
        Stage::Procurement => procurement_form(),
        Stage::Final => final_form(),
    }
}

/// Role that normally submits `stage`
pub fn role_for(stage: Stage) -> Role {
    match stage {
        Stage::Quality => Role::Quality,
        Stage::Engineering => Role::Engineer,
        Stage::Procurement => Role::Procurement,
        Stage::Final => Role::Inspector,
    }
}

/// Empty in-memory store with `role` already set
pub fn store_with_role(role: Role) -> SharedStore {
    let store = MemoryStore::shared();
    RoleContext::new(store.clone(), StorageKeys::default().role)
        .set_role(role)
        .unwrap();
    store
}

/// In-memory store holding `records` under the default key
pub fn seeded_store(records: Vec<NcrRecord>) -> SharedStore {
    let store = MemoryStore::shared();
    RecordStore::new(store.clone(), StorageKeys::default().records)
        .save(&records)
        .unwrap();
    store
}
