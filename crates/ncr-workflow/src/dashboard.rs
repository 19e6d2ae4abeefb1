//! Dashboard rows
//!
//! Each role sees the records it owns or is waiting on. A record waiting at
//! the role's stage offers to continue it; a record the role has already
//! signed off offers view/edit; everything else is hidden. Quality and Admin
//! see every row.

use ncr_core::{NcrRecord, Role, Stage, StagePages};
use serde::Serialize;

/// What the row's button does
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RowAction {
    /// Open the record on the view page
    ViewEdit { url: String },
    /// Fill in the role's stage
    Continue { stage: Stage, url: String },
}

/// One dashboard line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRow {
    pub number: Option<String>,
    pub supplier: Option<String>,
    pub status: Option<String>,
    pub stage: Stage,
    pub action: RowAction,
}

/// Last stage whose section has been signed off
fn last_completed(record: &NcrRecord) -> Option<Stage> {
    if record.is_closed() {
        Some(Stage::Final)
    } else {
        record.stage().previous()
    }
}

/// Action `role` gets for `record`, `None` when the row is hidden
#[must_use]
pub fn row_action(record: &NcrRecord, role: Role, pages: &StagePages) -> Option<RowAction> {
    let view_url = || match record.number.as_deref() {
        Some(number) => format!("{}?ncr={number}", pages.view),
        None => pages.view.clone(),
    };
    if role.is_superuser() {
        return Some(RowAction::ViewEdit { url: view_url() });
    }
    let own = Stage::for_role(role);
    if record.stage() == own && !record.is_closed() {
        let url = match record.number.as_deref() {
            Some(number) => format!("{}?ncr={number}", pages.for_stage(own)),
            None => pages.for_stage(own).to_string(),
        };
        return Some(RowAction::Continue { stage: own, url });
    }
    (last_completed(record) == Some(own)).then(|| RowAction::ViewEdit { url: view_url() })
}

/// Rows visible to `role`, in store order
#[must_use]
pub fn dashboard_rows(records: &[NcrRecord], role: Role, pages: &StagePages) -> Vec<DashboardRow> {
    records
        .iter()
        .filter_map(|record| {
            let action = row_action(record, role, pages)?;
            Some(DashboardRow {
                number: record.number.clone(),
                supplier: record.quality.supplier.clone(),
                status: record.status.clone(),
                stage: record.stage(),
                action,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(stage: Stage, seq: u32) -> NcrRecord {
        NcrRecord {
            number: Some(format!("NCR-2026-{seq:03}")),
            current_stage: Some(stage),
            ..Default::default()
        }
    }

    #[test]
    fn engineer_continues_waiting_records() {
        let pages = StagePages::default();
        let records = [
            at(Stage::Engineering, 11),
            at(Stage::Procurement, 12),
            at(Stage::Final, 13),
        ];
        let rows = dashboard_rows(&records, Role::Engineer, &pages);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].action,
            RowAction::Continue {
                stage: Stage::Engineering,
                url: "Create-NCR-Engineer.html?ncr=NCR-2026-011".into()
            }
        );
        assert_eq!(
            rows[1].action,
            RowAction::ViewEdit {
                url: "View-NCR.html?ncr=NCR-2026-012".into()
            }
        );
    }

    #[test]
    fn quality_sees_everything() {
        let records = [at(Stage::Engineering, 11), at(Stage::Final, 12)];
        let rows = dashboard_rows(&records, Role::Quality, &StagePages::default());
        assert_eq!(rows.len(), 2);
        assert!(rows
            .iter()
            .all(|r| matches!(r.action, RowAction::ViewEdit { .. })));
    }

    #[test]
    fn closed_record_belongs_to_inspector() {
        let mut record = at(Stage::Final, 11);
        let pages = StagePages::default();
        assert!(matches!(
            row_action(&record, Role::Inspector, &pages),
            Some(RowAction::Continue { .. })
        ));
        record.inspector.ncr_closed = Some(true);
        assert!(matches!(
            row_action(&record, Role::Inspector, &pages),
            Some(RowAction::ViewEdit { .. })
        ));
        assert_eq!(row_action(&record, Role::Procurement, &pages), None);
    }
}
