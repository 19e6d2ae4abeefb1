//! NCR records
//!
//! A record is a flat JSON object; in Rust it is split into one section struct
//! per stage and flattened back on (de)serialization. Every field is optional
//! because a record fills up stage by stage.
//!
//! # Merge Semantics
//!
//! [`NcrRecord::merge_stage`] copies only the fields the incoming section
//! actually carries. A `None` never clears a stored value, and the record
//! number is never overwritten once assigned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ParseError;
use crate::form::{fields, FormValues, DISPOSITION_OPTIONS, SUPPLIER_DISPOSITION_OPTIONS};
use crate::stage::Stage;

/// Status text for a record that has not been closed
pub const STATUS_IN_PROGRESS: &str = "In Progress";

/// Status text once the inspector closes the NCR
pub const STATUS_CLOSED: &str = "Closed";

/// Reads a quantity stored either as a number or as numeric text
///
/// Text that is not a count reads as `None`.
fn quantity<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Count(u32),
        Text(String),
    }

    Ok(match Option::<Stored>::deserialize(deserializer)? {
        Some(Stored::Count(n)) => Some(n),
        Some(Stored::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

/// Engineering disposition decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Disposition {
    /// Use as is
    UseAsIs,
    /// Repair
    Repair,
    /// Rework
    Rework,
    /// Scrap
    Scrap,
}

impl Disposition {
    /// Form value of this option
    #[must_use]
    pub fn as_value(&self) -> &'static str {
        match self {
            Disposition::UseAsIs => DISPOSITION_OPTIONS[0],
            Disposition::Repair => DISPOSITION_OPTIONS[1],
            Disposition::Rework => DISPOSITION_OPTIONS[2],
            Disposition::Scrap => DISPOSITION_OPTIONS[3],
        }
    }

    /// Parses a form value
    ///
    /// # Errors
    /// Returns [`ParseError::InvalidChoice`] for anything outside the option list.
    pub fn from_value(value: &str) -> Result<Self, ParseError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "use-as-is" => Ok(Disposition::UseAsIs),
            "repair" => Ok(Disposition::Repair),
            "rework" => Ok(Disposition::Rework),
            "scrap" => Ok(Disposition::Scrap),
            _ => Err(ParseError::InvalidChoice {
                group: fields::DISPOSITION,
                value: value.to_string(),
            }),
        }
    }
}

/// What happens to the nonconforming material at the supplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierDisposition {
    /// Ship back to the supplier; needs an RMA and carrier
    Return,
    /// Dispose on site
    Dispose,
}

impl SupplierDisposition {
    /// Form value of this option
    #[must_use]
    pub fn as_value(&self) -> &'static str {
        match self {
            SupplierDisposition::Return => SUPPLIER_DISPOSITION_OPTIONS[0],
            SupplierDisposition::Dispose => SUPPLIER_DISPOSITION_OPTIONS[1],
        }
    }

    /// Parses a form value
    ///
    /// # Errors
    /// Returns [`ParseError::InvalidChoice`] for anything but return/dispose.
    pub fn from_value(value: &str) -> Result<Self, ParseError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "return" => Ok(SupplierDisposition::Return),
            "dispose" => Ok(SupplierDisposition::Dispose),
            _ => Err(ParseError::InvalidChoice {
                group: fields::SUPPLIER_DISPOSITION,
                value: value.to_string(),
            }),
        }
    }
}

/// Fields filled by the quality representative
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitySection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_reported: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub po_or_prod: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_description: Option<String>,
    #[serde(
        default,
        deserialize_with = "quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub qty_received: Option<u32>,
    #[serde(
        default,
        deserialize_with = "quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub qty_defective: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defect_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marked_nonconforming: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_by: Option<String>,
}

impl QualitySection {
    /// Reads the section from form values
    #[must_use]
    pub fn from_form(form: &FormValues) -> Self {
        Self {
            date_reported: form.text(fields::DATE_REPORTED),
            process: form.text(fields::PROCESS),
            supplier: form.text(fields::SUPPLIER),
            po_or_prod: form.text(fields::PO_OR_PROD),
            sales_order: form.text(fields::SALES_ORDER),
            item_description: form.text(fields::ITEM_DESCRIPTION),
            qty_received: form.quantity(fields::QTY_RECEIVED),
            qty_defective: form.quantity(fields::QTY_DEFECTIVE),
            defect_description: form.text(fields::DEFECT_DESCRIPTION),
            marked_nonconforming: form.flag(fields::MARKED_NONCONFORMING),
            reported_by: form.text(fields::REPORTED_BY),
        }
    }

    fn write_form(&self, form: &mut FormValues) {
        put(form, fields::DATE_REPORTED, self.date_reported.clone());
        put(form, fields::PROCESS, self.process.clone());
        put(form, fields::SUPPLIER, self.supplier.clone());
        put(form, fields::PO_OR_PROD, self.po_or_prod.clone());
        put(form, fields::SALES_ORDER, self.sales_order.clone());
        put(form, fields::ITEM_DESCRIPTION, self.item_description.clone());
        put(form, fields::QTY_RECEIVED, self.qty_received.map(|q| q.to_string()));
        put(form, fields::QTY_DEFECTIVE, self.qty_defective.map(|q| q.to_string()));
        put(form, fields::DEFECT_DESCRIPTION, self.defect_description.clone());
        put(form, fields::MARKED_NONCONFORMING, self.marked_nonconforming.map(yes_no));
        put(form, fields::REPORTED_BY, self.reported_by.clone());
    }

    fn merge(&mut self, incoming: Self) {
        keep(&mut self.date_reported, incoming.date_reported);
        keep(&mut self.process, incoming.process);
        keep(&mut self.supplier, incoming.supplier);
        keep(&mut self.po_or_prod, incoming.po_or_prod);
        keep(&mut self.sales_order, incoming.sales_order);
        keep(&mut self.item_description, incoming.item_description);
        keep(&mut self.qty_received, incoming.qty_received);
        keep(&mut self.qty_defective, incoming.qty_defective);
        keep(&mut self.defect_description, incoming.defect_description);
        keep(&mut self.marked_nonconforming, incoming.marked_nonconforming);
        keep(&mut self.reported_by, incoming.reported_by);
    }
}

/// Fields filled by engineering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineeringSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposition: Option<Disposition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposition_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_notification: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawing_update: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engineer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engineer_date: Option<String>,
}

impl EngineeringSection {
    /// Reads the section from form values
    #[must_use]
    pub fn from_form(form: &FormValues) -> Self {
        Self {
            disposition: form
                .text(fields::DISPOSITION)
                .and_then(|v| Disposition::from_value(&v).ok()),
            disposition_details: form.text(fields::DISPOSITION_DETAILS),
            customer_notification: form.flag(fields::CUSTOMER_NOTIFICATION),
            drawing_update: form.flag(fields::DRAWING_UPDATE),
            original_revision: form.text(fields::ORIGINAL_REVISION),
            updated_revision: form.text(fields::UPDATED_REVISION),
            engineer_name: form.text(fields::ENGINEER_NAME),
            engineer_date: form.text(fields::ENGINEER_DATE),
        }
    }

    fn write_form(&self, form: &mut FormValues) {
        put(form, fields::DISPOSITION, self.disposition.map(|d| d.as_value().to_string()));
        put(form, fields::DISPOSITION_DETAILS, self.disposition_details.clone());
        put(form, fields::CUSTOMER_NOTIFICATION, self.customer_notification.map(yes_no));
        put(form, fields::DRAWING_UPDATE, self.drawing_update.map(yes_no));
        put(form, fields::ORIGINAL_REVISION, self.original_revision.clone());
        put(form, fields::UPDATED_REVISION, self.updated_revision.clone());
        put(form, fields::ENGINEER_NAME, self.engineer_name.clone());
        put(form, fields::ENGINEER_DATE, self.engineer_date.clone());
    }

    fn merge(&mut self, incoming: Self) {
        keep(&mut self.disposition, incoming.disposition);
        keep(&mut self.disposition_details, incoming.disposition_details);
        keep(&mut self.customer_notification, incoming.customer_notification);
        keep(&mut self.drawing_update, incoming.drawing_update);
        keep(&mut self.original_revision, incoming.original_revision);
        keep(&mut self.updated_revision, incoming.updated_revision);
        keep(&mut self.engineer_name, incoming.engineer_name);
        keep(&mut self.engineer_date, incoming.engineer_date);
    }
}

/// Fields filled by procurement / operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_decision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_raised: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations_manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_disposition: Option<SupplierDisposition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rma_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_details: Option<String>,
}

impl ProcurementSection {
    /// Reads the section from form values
    #[must_use]
    pub fn from_form(form: &FormValues) -> Self {
        Self {
            purchase_decision: form.text(fields::PURCHASE_DECISION),
            car_raised: form.flag(fields::CAR_RAISED),
            car_number: form.text(fields::CAR_NUMBER),
            follow_up_required: form.flag(fields::FOLLOW_UP_REQUIRED),
            follow_up_details: form.text(fields::FOLLOW_UP_DETAILS),
            operations_manager: form.text(fields::OPERATIONS_MANAGER),
            operations_date: form.text(fields::OPERATIONS_DATE),
            supplier_disposition: form
                .text(fields::SUPPLIER_DISPOSITION)
                .and_then(|v| SupplierDisposition::from_value(&v).ok()),
            rma_number: form.text(fields::RMA_NUMBER),
            carrier_details: form.text(fields::CARRIER_DETAILS),
        }
    }

    fn write_form(&self, form: &mut FormValues) {
        put(form, fields::PURCHASE_DECISION, self.purchase_decision.clone());
        put(form, fields::CAR_RAISED, self.car_raised.map(yes_no));
        put(form, fields::CAR_NUMBER, self.car_number.clone());
        put(form, fields::FOLLOW_UP_REQUIRED, self.follow_up_required.map(yes_no));
        put(form, fields::FOLLOW_UP_DETAILS, self.follow_up_details.clone());
        put(form, fields::OPERATIONS_MANAGER, self.operations_manager.clone());
        put(form, fields::OPERATIONS_DATE, self.operations_date.clone());
        put(
            form,
            fields::SUPPLIER_DISPOSITION,
            self.supplier_disposition.map(|d| d.as_value().to_string()),
        );
        put(form, fields::RMA_NUMBER, self.rma_number.clone());
        put(form, fields::CARRIER_DETAILS, self.carrier_details.clone());
    }

    fn merge(&mut self, incoming: Self) {
        keep(&mut self.purchase_decision, incoming.purchase_decision);
        keep(&mut self.car_raised, incoming.car_raised);
        keep(&mut self.car_number, incoming.car_number);
        keep(&mut self.follow_up_required, incoming.follow_up_required);
        keep(&mut self.follow_up_details, incoming.follow_up_details);
        keep(&mut self.operations_manager, incoming.operations_manager);
        keep(&mut self.operations_date, incoming.operations_date);
        keep(&mut self.supplier_disposition, incoming.supplier_disposition);
        keep(&mut self.rma_number, incoming.rma_number);
        keep(&mut self.carrier_details, incoming.carrier_details);
    }
}

/// Fields filled at the final review
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectorSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reinspection_acceptable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_ncr_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspector_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspector_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ncr_closed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_dept_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_dept_date: Option<String>,
}

impl InspectorSection {
    /// Reads the section from form values
    #[must_use]
    pub fn from_form(form: &FormValues) -> Self {
        Self {
            reinspection_acceptable: form.flag(fields::REINSPECTION_ACCEPTABLE),
            new_ncr_number: form.text(fields::NEW_NCR_NUMBER),
            inspector_name: form.text(fields::INSPECTOR_NAME),
            inspector_date: form.text(fields::INSPECTOR_DATE),
            ncr_closed: form.flag(fields::NCR_CLOSED),
            quality_dept_name: form.text(fields::QUALITY_DEPT_NAME),
            quality_dept_date: form.text(fields::QUALITY_DEPT_DATE),
        }
    }

    fn write_form(&self, form: &mut FormValues) {
        put(form, fields::REINSPECTION_ACCEPTABLE, self.reinspection_acceptable.map(yes_no));
        put(form, fields::NEW_NCR_NUMBER, self.new_ncr_number.clone());
        put(form, fields::INSPECTOR_NAME, self.inspector_name.clone());
        put(form, fields::INSPECTOR_DATE, self.inspector_date.clone());
        put(form, fields::NCR_CLOSED, self.ncr_closed.map(yes_no));
        put(form, fields::QUALITY_DEPT_NAME, self.quality_dept_name.clone());
        put(form, fields::QUALITY_DEPT_DATE, self.quality_dept_date.clone());
    }

    fn merge(&mut self, incoming: Self) {
        keep(&mut self.reinspection_acceptable, incoming.reinspection_acceptable);
        keep(&mut self.new_ncr_number, incoming.new_ncr_number);
        keep(&mut self.inspector_name, incoming.inspector_name);
        keep(&mut self.inspector_date, incoming.inspector_date);
        keep(&mut self.ncr_closed, incoming.ncr_closed);
        keep(&mut self.quality_dept_name, incoming.quality_dept_name);
        keep(&mut self.quality_dept_date, incoming.quality_dept_date);
    }
}

/// Partial record produced by one stage's form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageFields {
    /// Quality section
    Quality(QualitySection),
    /// Engineering section
    Engineering(EngineeringSection),
    /// Procurement section
    Procurement(ProcurementSection),
    /// Inspector section
    Final(InspectorSection),
}

impl StageFields {
    /// Reads the given stage's section from form values
    #[must_use]
    pub fn from_form(stage: Stage, form: &FormValues) -> Self {
        match stage {
            Stage::Quality => StageFields::Quality(QualitySection::from_form(form)),
            Stage::Engineering => StageFields::Engineering(EngineeringSection::from_form(form)),
            Stage::Procurement => StageFields::Procurement(ProcurementSection::from_form(form)),
            Stage::Final => StageFields::Final(InspectorSection::from_form(form)),
        }
    }

    /// Stage these fields belong to
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            StageFields::Quality(_) => Stage::Quality,
            StageFields::Engineering(_) => Stage::Engineering,
            StageFields::Procurement(_) => Stage::Procurement,
            StageFields::Final(_) => Stage::Final,
        }
    }
}

/// A non-conformance report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NcrRecord {
    /// `NCR-<year>-<seq>`, immutable once assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Free text, e.g. "In Progress"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<Stage>,
    #[serde(flatten)]
    pub quality: QualitySection,
    #[serde(flatten)]
    pub engineering: EngineeringSection,
    #[serde(flatten)]
    pub procurement: ProcurementSection,
    #[serde(flatten)]
    pub inspector: InspectorSection,
}

impl NcrRecord {
    /// Merges one stage's fields into the record. Other stages are untouched.
    pub fn merge_stage(&mut self, incoming: StageFields) {
        match incoming {
            StageFields::Quality(s) => self.quality.merge(s),
            StageFields::Engineering(s) => self.engineering.merge(s),
            StageFields::Procurement(s) => self.procurement.merge(s),
            StageFields::Final(s) => self.inspector.merge(s),
        }
    }

    /// Stage the record currently waits on, `Quality` when never submitted
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.current_stage.unwrap_or_default()
    }

    /// True once the inspector closed the NCR
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inspector.ncr_closed == Some(true)
    }

    /// True when no field of the stage's section is set
    #[must_use]
    pub fn section_is_empty(&self, stage: Stage) -> bool {
        match stage {
            Stage::Quality => self.quality == QualitySection::default(),
            Stage::Engineering => self.engineering == EngineeringSection::default(),
            Stage::Procurement => self.procurement == ProcurementSection::default(),
            Stage::Final => self.inspector == InspectorSection::default(),
        }
    }

    /// Form values a page would show for one stage's section
    ///
    /// The Quality section also carries the number and status fields.
    #[must_use]
    pub fn to_form(&self, stage: Stage) -> FormValues {
        let mut form = FormValues::new();
        match stage {
            Stage::Quality => {
                put(&mut form, fields::NCR_NUMBER, self.number.clone());
                put(&mut form, fields::STATUS, self.status.clone());
                self.quality.write_form(&mut form);
            }
            Stage::Engineering => self.engineering.write_form(&mut form),
            Stage::Procurement => self.procurement.write_form(&mut form),
            Stage::Final => self.inspector.write_form(&mut form),
        }
        form
    }
}

fn keep<T>(slot: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}

fn put(form: &mut FormValues, field: &str, value: Option<String>) {
    if let Some(value) = value {
        form.set(field, value);
    }
}

fn yes_no(flag: bool) -> String {
    let value = if flag { "yes" } else { "no" };
    value.to_string()
}
