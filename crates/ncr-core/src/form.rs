//! Form values and field identifiers
//!
//! A form is modelled as a flat mapping from field id to the raw string the
//! user entered, the same shape a page exposes through its inputs. Choice
//! groups (radio buttons) store the selected option's value under the group id.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::stage::Stage;

/// Field identifiers, grouped by owning stage
pub mod fields {
    // Quality
    /// NCR number (read-only once generated)
    pub const NCR_NUMBER: &str = "ncrNumber";
    /// Date the non-conformance was reported
    pub const DATE_REPORTED: &str = "dateReported";
    /// Applicable process
    pub const PROCESS: &str = "processApplicable";
    /// Supplier name
    pub const SUPPLIER: &str = "supplierName";
    /// PO or production number
    pub const PO_OR_PROD: &str = "poOrProdNo";
    /// Sales order number
    pub const SALES_ORDER: &str = "salesOrderNo";
    /// Item description (SAP)
    pub const ITEM_DESCRIPTION: &str = "itemDescriptionSAP";
    /// Quantity received
    pub const QTY_RECEIVED: &str = "qtyReceived";
    /// Quantity defective
    pub const QTY_DEFECTIVE: &str = "qtyDefective";
    /// Description of the defect
    pub const DEFECT_DESCRIPTION: &str = "defectDescription";
    /// Item marked nonconforming (yes/no)
    pub const MARKED_NONCONFORMING: &str = "itemMarkedNonconforming";
    /// Reporter name
    pub const REPORTED_BY: &str = "reportedBy";
    /// Free-text workflow status
    pub const STATUS: &str = "status";

    // Engineering
    /// Disposition decision
    pub const DISPOSITION: &str = "disposition";
    /// Disposition details
    pub const DISPOSITION_DETAILS: &str = "dispositionDetails";
    /// Customer notification required (yes/no)
    pub const CUSTOMER_NOTIFICATION: &str = "customerNotification";
    /// Drawing update required (yes/no)
    pub const DRAWING_UPDATE: &str = "drawingUpdate";
    /// Original drawing revision
    pub const ORIGINAL_REVISION: &str = "originalRevision";
    /// Updated drawing revision
    pub const UPDATED_REVISION: &str = "updatedRevision";
    /// Engineer name
    pub const ENGINEER_NAME: &str = "engineerName";
    /// Engineering sign-off date
    pub const ENGINEER_DATE: &str = "engineerDate";

    // Procurement / operations
    /// Purchasing decision
    pub const PURCHASE_DECISION: &str = "purchaseDecision";
    /// Corrective action request raised (yes/no)
    pub const CAR_RAISED: &str = "carRaised";
    /// Corrective action request number
    pub const CAR_NUMBER: &str = "carNumber";
    /// Follow-up required (yes/no)
    pub const FOLLOW_UP_REQUIRED: &str = "followUpRequired";
    /// Follow-up details
    pub const FOLLOW_UP_DETAILS: &str = "followUpDetails";
    /// Operations manager name
    pub const OPERATIONS_MANAGER: &str = "operationsManager";
    /// Operations sign-off date
    pub const OPERATIONS_DATE: &str = "operationsDate";
    /// Supplier disposition (return/dispose)
    pub const SUPPLIER_DISPOSITION: &str = "supplierDisposition";
    /// Return material authorization number
    pub const RMA_NUMBER: &str = "rmaNumber";
    /// Carrier name and account details
    pub const CARRIER_DETAILS: &str = "carrierDetails";

    // Inspector / final review
    /// Re-inspection acceptable (yes/no)
    pub const REINSPECTION_ACCEPTABLE: &str = "reinspectionAcceptable";
    /// Follow-up NCR number when re-inspection fails
    pub const NEW_NCR_NUMBER: &str = "newNcrNumber";
    /// Inspector name
    pub const INSPECTOR_NAME: &str = "inspectorName";
    /// Inspection date
    pub const INSPECTOR_DATE: &str = "inspectorDate";
    /// NCR closed (yes/no)
    pub const NCR_CLOSED: &str = "ncrClosed";
    /// Quality department sign-off name
    pub const QUALITY_DEPT_NAME: &str = "qualityDeptName";
    /// Quality department sign-off date
    pub const QUALITY_DEPT_DATE: &str = "qualityDeptDate";
}

/// Yes/no radio options
pub const YES_NO: &[&str] = &["yes", "no"];

/// Engineering disposition options
pub const DISPOSITION_OPTIONS: &[&str] = &["use-as-is", "repair", "rework", "scrap"];

/// Supplier disposition options
pub const SUPPLIER_DISPOSITION_OPTIONS: &[&str] = &["return", "dispose"];

/// Fields rendered in a stage's section, in page order
#[must_use]
pub fn stage_fields(stage: Stage) -> &'static [&'static str] {
    use fields::*;
    match stage {
        Stage::Quality => &[
            NCR_NUMBER,
            DATE_REPORTED,
            PROCESS,
            SUPPLIER,
            PO_OR_PROD,
            SALES_ORDER,
            ITEM_DESCRIPTION,
            QTY_RECEIVED,
            QTY_DEFECTIVE,
            DEFECT_DESCRIPTION,
            MARKED_NONCONFORMING,
            REPORTED_BY,
            STATUS,
        ],
        Stage::Engineering => &[
            DISPOSITION,
            DISPOSITION_DETAILS,
            CUSTOMER_NOTIFICATION,
            DRAWING_UPDATE,
            ORIGINAL_REVISION,
            UPDATED_REVISION,
            ENGINEER_NAME,
            ENGINEER_DATE,
        ],
        Stage::Procurement => &[
            PURCHASE_DECISION,
            CAR_RAISED,
            CAR_NUMBER,
            FOLLOW_UP_REQUIRED,
            FOLLOW_UP_DETAILS,
            OPERATIONS_MANAGER,
            OPERATIONS_DATE,
            SUPPLIER_DISPOSITION,
            RMA_NUMBER,
            CARRIER_DETAILS,
        ],
        Stage::Final => &[
            REINSPECTION_ACCEPTABLE,
            NEW_NCR_NUMBER,
            INSPECTOR_NAME,
            INSPECTOR_DATE,
            NCR_CLOSED,
            QUALITY_DEPT_NAME,
            QUALITY_DEPT_DATE,
        ],
    }
}

/// Raw field values keyed by field id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    /// Empty form
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, builder style
    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Set a field
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.0.insert(field.to_string(), value.into());
    }

    /// Remove a field, returning its previous value
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    /// Raw value as entered. Absent fields are `None`.
    #[inline]
    #[must_use]
    pub fn raw(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Trimmed value, `None` when absent or blank
    #[must_use]
    pub fn text(&self, field: &str) -> Option<String> {
        self.raw(field)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// True when the field is absent or only whitespace
    #[inline]
    #[must_use]
    pub fn is_blank(&self, field: &str) -> bool {
        self.raw(field).map_or(true, |v| v.trim().is_empty())
    }

    /// Parses a yes/no choice. Anything else is `None`.
    #[must_use]
    pub fn flag(&self, field: &str) -> Option<bool> {
        match self.text(field)?.to_ascii_lowercase().as_str() {
            "yes" | "true" => Some(true),
            "no" | "false" => Some(false),
            _ => None,
        }
    }

    /// Parses a non-negative whole number. Invalid input is `None`.
    #[must_use]
    pub fn quantity(&self, field: &str) -> Option<u32> {
        self.text(field)?.parse().ok()
    }

    /// Iterate over `(field, value)` pairs in field id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields present
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no field is present
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses `key=value`. The value may itself contain `=`.
    #[must_use]
    pub fn parse_pair(pair: &str) -> Option<(String, String)> {
        let (key, value) = pair.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some((key.to_string(), value.to_string()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
