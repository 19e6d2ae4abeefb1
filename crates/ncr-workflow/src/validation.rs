//! Form validators
//!
//! Pure functions from [`FormValues`] to a [`ValidationReport`]. A report
//! keeps at most one message per field, in page order, so the first entry
//! is the control that receives focus.
//!
//! Rules per stage:
//! - required text fields (trimmed, non-empty)
//! - required choice groups (one valid option selected)
//! - quantities on the Quality stage (whole, non-negative, defective ≤ received)
//! - conditional requirements triggered by another field's value

use indexmap::IndexMap;
use ncr_core::form::{DISPOSITION_OPTIONS, SUPPLIER_DISPOSITION_OPTIONS, YES_NO};
use ncr_core::{fields, stage_fields, FormValues, NcrNumber, Stage, SupplierDisposition};
use serde::Serialize;

/// Empty required field
pub const MSG_REQUIRED: &str = "This field is required.";
/// Choice group with nothing selected
pub const MSG_CHOICE: &str = "You must select an option.";
/// Choice group with a value outside its options
pub const MSG_INVALID_CHOICE: &str = "Select a valid option.";
/// Quantity that is not an integer
pub const MSG_NOT_NUMBER: &str = "Enter a whole number.";
/// Quantity below zero
pub const MSG_NEGATIVE: &str = "Quantity cannot be negative.";
/// Defective quantity above received quantity
pub const MSG_EXCEEDS: &str = "Defective quantity cannot exceed received quantity.";

/// NCR number not in `NCR-<year>-<seq>` form
pub const MSG_MALFORMED_NUMBER: &str = "Use the format NCR-YYYY-NNN.";

const SUMMARY_HEADER: &str = "Please complete all the required fields";

/// Field errors of one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: IndexMap<String, String>,
}

impl ValidationReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error. The first message for a field wins.
    pub fn add(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether `field` already has an error
    #[inline]
    #[must_use]
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Field that should receive focus
    #[must_use]
    pub fn first_invalid(&self) -> Option<&str> {
        self.errors.keys().next().map(String::as_str)
    }

    /// Message shown next to `field`
    #[must_use]
    pub fn message(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// `(field, message)` pairs in report order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Blocking message listing every failed field, empty when valid
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_valid() {
            return String::new();
        }
        let mut out = format!("{SUMMARY_HEADER}:");
        for (field, message) in &self.errors {
            out.push_str(&format!("\n- {field}: {message}"));
        }
        out
    }

    /// Sorts entries by position in `order`; unknown fields go last
    pub fn order_by(&mut self, order: &[&str]) {
        let rank = |field: &str| order.iter().position(|f| *f == field).unwrap_or(usize::MAX);
        self.errors.sort_by(|a, _, b, _| rank(a.as_str()).cmp(&rank(b.as_str())));
    }
}

/// A radio group and its allowed values
#[derive(Debug, Clone, Copy)]
pub struct ChoiceGroup {
    pub field: &'static str,
    pub options: &'static [&'static str],
}

impl ChoiceGroup {
    #[must_use]
    pub const fn new(field: &'static str, options: &'static [&'static str]) -> Self {
        Self { field, options }
    }

    /// Yes/no group
    #[must_use]
    pub const fn yes_no(field: &'static str) -> Self {
        Self::new(field, YES_NO)
    }
}

/// Flags every blank field in `required`
pub fn require_fields(form: &FormValues, required: &[&str], report: &mut ValidationReport) {
    for field in required {
        if form.is_blank(field) {
            report.add(field, MSG_REQUIRED);
        }
    }
}

/// Flags a group with no selection or an unknown value
pub fn require_choice(form: &FormValues, group: ChoiceGroup, report: &mut ValidationReport) {
    match form.text(group.field) {
        None => report.add(group.field, MSG_CHOICE),
        Some(value) => {
            let known = group
                .options
                .iter()
                .any(|option| option.eq_ignore_ascii_case(&value));
            if !known {
                report.add(group.field, MSG_INVALID_CHOICE);
            }
        }
    }
}

/// Requires `required` only when `condition` holds
pub fn require_when(
    condition: bool,
    form: &FormValues,
    required: &[&str],
    report: &mut ValidationReport,
) {
    if condition {
        require_fields(form, required, report);
    }
}

/// Parses a quantity field
///
/// Blank fields are left to the required check. Returns the value when it is
/// a non-negative whole number.
fn check_quantity(form: &FormValues, field: &str, report: &mut ValidationReport) -> Option<u32> {
    let raw = form.text(field)?;
    match raw.parse::<i64>() {
        Err(_) => {
            report.add(field, MSG_NOT_NUMBER);
            None
        }
        Ok(n) if n < 0 => {
            report.add(field, MSG_NEGATIVE);
            None
        }
        Ok(n) => match u32::try_from(n) {
            Ok(n) => Some(n),
            Err(_) => {
                report.add(field, MSG_NOT_NUMBER);
                None
            }
        },
    }
}

/// Received/defective quantity rules
///
/// Returns the defective count when both quantities are valid.
pub fn check_quantities(form: &FormValues, report: &mut ValidationReport) -> Option<u32> {
    let received = check_quantity(form, fields::QTY_RECEIVED, report);
    let defective = check_quantity(form, fields::QTY_DEFECTIVE, report);
    match (received, defective) {
        (Some(received), Some(defective)) if defective > received => {
            report.add(fields::QTY_DEFECTIVE, MSG_EXCEEDS);
            None
        }
        (Some(_), Some(defective)) => Some(defective),
        _ => None,
    }
}

/// Flags a filled-in NCR number that does not parse
pub fn check_number_format(form: &FormValues, report: &mut ValidationReport) {
    if let Some(raw) = form.text(fields::NCR_NUMBER) {
        if raw.parse::<NcrNumber>().is_err() {
            report.add(fields::NCR_NUMBER, MSG_MALFORMED_NUMBER);
        }
    }
}

/// Quality fields that must always be filled
pub const QUALITY_REQUIRED: &[&str] = &[
    fields::NCR_NUMBER,
    fields::DATE_REPORTED,
    fields::PROCESS,
    fields::SUPPLIER,
    fields::PO_OR_PROD,
    fields::SALES_ORDER,
    fields::ITEM_DESCRIPTION,
    fields::QTY_RECEIVED,
    fields::QTY_DEFECTIVE,
    fields::REPORTED_BY,
];

/// Engineering fields that must always be filled
pub const ENGINEERING_REQUIRED: &[&str] = &[
    fields::DISPOSITION_DETAILS,
    fields::ENGINEER_NAME,
    fields::ENGINEER_DATE,
];

/// Procurement fields that must always be filled
pub const PROCUREMENT_REQUIRED: &[&str] = &[
    fields::PURCHASE_DECISION,
    fields::OPERATIONS_MANAGER,
    fields::OPERATIONS_DATE,
];

/// Final review fields that must always be filled
pub const FINAL_REQUIRED: &[&str] = &[fields::INSPECTOR_NAME, fields::INSPECTOR_DATE];

/// Validates the Quality section
#[must_use]
pub fn validate_quality(form: &FormValues) -> ValidationReport {
    let mut report = ValidationReport::new();
    require_fields(form, QUALITY_REQUIRED, &mut report);
    check_number_format(form, &mut report);
    require_choice(
        form,
        ChoiceGroup::yes_no(fields::MARKED_NONCONFORMING),
        &mut report,
    );
    let defective = check_quantities(form, &mut report);
    require_when(
        defective.is_some_and(|n| n > 0),
        form,
        &[fields::DEFECT_DESCRIPTION],
        &mut report,
    );
    report
}

/// Validates the Engineering section
#[must_use]
pub fn validate_engineering(form: &FormValues) -> ValidationReport {
    let mut report = ValidationReport::new();
    require_fields(form, ENGINEERING_REQUIRED, &mut report);
    require_choice(
        form,
        ChoiceGroup::new(fields::DISPOSITION, DISPOSITION_OPTIONS),
        &mut report,
    );
    require_choice(
        form,
        ChoiceGroup::yes_no(fields::CUSTOMER_NOTIFICATION),
        &mut report,
    );
    require_choice(form, ChoiceGroup::yes_no(fields::DRAWING_UPDATE), &mut report);
    require_when(
        form.flag(fields::DRAWING_UPDATE) == Some(true),
        form,
        &[fields::ORIGINAL_REVISION, fields::UPDATED_REVISION],
        &mut report,
    );
    report
}

/// Validates the Procurement section
#[must_use]
pub fn validate_procurement(form: &FormValues) -> ValidationReport {
    let mut report = ValidationReport::new();
    require_fields(form, PROCUREMENT_REQUIRED, &mut report);
    require_choice(form, ChoiceGroup::yes_no(fields::CAR_RAISED), &mut report);
    require_choice(
        form,
        ChoiceGroup::yes_no(fields::FOLLOW_UP_REQUIRED),
        &mut report,
    );
    require_choice(
        form,
        ChoiceGroup::new(fields::SUPPLIER_DISPOSITION, SUPPLIER_DISPOSITION_OPTIONS),
        &mut report,
    );
    require_when(
        form.flag(fields::CAR_RAISED) == Some(true),
        form,
        &[fields::CAR_NUMBER],
        &mut report,
    );
    require_when(
        form.flag(fields::FOLLOW_UP_REQUIRED) == Some(true),
        form,
        &[fields::FOLLOW_UP_DETAILS],
        &mut report,
    );
    let returning = form
        .text(fields::SUPPLIER_DISPOSITION)
        .and_then(|v| SupplierDisposition::from_value(&v).ok())
        == Some(SupplierDisposition::Return);
    require_when(
        returning,
        form,
        &[fields::RMA_NUMBER, fields::CARRIER_DETAILS],
        &mut report,
    );
    report
}

/// Validates the final review section
#[must_use]
pub fn validate_final(form: &FormValues) -> ValidationReport {
    let mut report = ValidationReport::new();
    require_fields(form, FINAL_REQUIRED, &mut report);
    require_choice(
        form,
        ChoiceGroup::yes_no(fields::REINSPECTION_ACCEPTABLE),
        &mut report,
    );
    require_choice(form, ChoiceGroup::yes_no(fields::NCR_CLOSED), &mut report);
    require_when(
        form.flag(fields::REINSPECTION_ACCEPTABLE) == Some(false),
        form,
        &[fields::NEW_NCR_NUMBER],
        &mut report,
    );
    require_when(
        form.flag(fields::NCR_CLOSED) == Some(true),
        form,
        &[fields::QUALITY_DEPT_NAME, fields::QUALITY_DEPT_DATE],
        &mut report,
    );
    report
}

/// Validates one stage's section, errors in page order
#[must_use]
pub fn validate_stage(stage: Stage, form: &FormValues) -> ValidationReport {
    let mut report = match stage {
        Stage::Quality => validate_quality(form),
        Stage::Engineering => validate_engineering(form),
        Stage::Procurement => validate_procurement(form),
        Stage::Final => validate_final(form),
    };
    report.order_by(stage_fields(stage));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn quantities(received: &str, defective: &str) -> FormValues {
        FormValues::new()
            .with(fields::QTY_RECEIVED, received)
            .with(fields::QTY_DEFECTIVE, defective)
    }

    #[test]
    fn whitespace_is_blank() {
        let form = FormValues::new().with(fields::ENGINEER_NAME, "   ");
        let mut report = ValidationReport::new();
        require_fields(&form, &[fields::ENGINEER_NAME], &mut report);
        assert_eq!(report.message(fields::ENGINEER_NAME), Some(MSG_REQUIRED));
    }

    #[test]
    fn choice_outside_group_is_rejected() {
        let form = FormValues::new().with(fields::DISPOSITION, "bury");
        let mut report = ValidationReport::new();
        require_choice(
            &form,
            ChoiceGroup::new(fields::DISPOSITION, DISPOSITION_OPTIONS),
            &mut report,
        );
        assert_eq!(report.message(fields::DISPOSITION), Some(MSG_INVALID_CHOICE));
    }

    #[test]
    fn quantity_messages() {
        let mut report = ValidationReport::new();
        check_quantities(&quantities("ten", "-1"), &mut report);
        assert_eq!(report.message(fields::QTY_RECEIVED), Some(MSG_NOT_NUMBER));
        assert_eq!(report.message(fields::QTY_DEFECTIVE), Some(MSG_NEGATIVE));

        let mut report = ValidationReport::new();
        check_quantities(&quantities("5", "6"), &mut report);
        assert_eq!(report.message(fields::QTY_DEFECTIVE), Some(MSG_EXCEEDS));
        assert!(!report.has_error(fields::QTY_RECEIVED));

        let mut report = ValidationReport::new();
        assert_eq!(check_quantities(&quantities(" 5 ", "5"), &mut report), Some(5));
        assert!(report.is_valid());
    }

    #[test]
    fn number_must_be_well_formed() {
        for bad in ["hello", "NCR-26-011", "NCR-2026-"] {
            let form = FormValues::new().with(fields::NCR_NUMBER, bad);
            let report = validate_quality(&form);
            assert_eq!(report.message(fields::NCR_NUMBER), Some(MSG_MALFORMED_NUMBER));
        }
        let form = FormValues::new().with(fields::NCR_NUMBER, "NCR-2026-011");
        assert!(!validate_quality(&form).has_error(fields::NCR_NUMBER));
    }

    #[test]
    fn fractional_quantity_is_not_whole() {
        let mut report = ValidationReport::new();
        check_quantities(&quantities("2.5", "1"), &mut report);
        assert_eq!(report.message(fields::QTY_RECEIVED), Some(MSG_NOT_NUMBER));
    }

    #[test]
    fn blank_quantity_reports_required_only() {
        let report = validate_quality(&FormValues::new());
        assert_eq!(report.message(fields::QTY_RECEIVED), Some(MSG_REQUIRED));
        assert_eq!(
            report.message(fields::MARKED_NONCONFORMING),
            Some(MSG_CHOICE)
        );
        assert!(!report.has_error(fields::DEFECT_DESCRIPTION));
    }

    #[test]
    fn errors_follow_page_order() {
        let report = validate_stage(Stage::Quality, &FormValues::new());
        assert_eq!(report.first_invalid(), Some(fields::NCR_NUMBER));
        let order: Vec<_> = report.iter().map(|(f, _)| f).collect();
        let page: Vec<_> = stage_fields(Stage::Quality)
            .iter()
            .copied()
            .filter(|f| report.has_error(f))
            .collect();
        assert_eq!(order, page);
    }

    #[test]
    fn drawing_update_requires_revisions() {
        let form = FormValues::new()
            .with(fields::DISPOSITION, "rework")
            .with(fields::DISPOSITION_DETAILS, "Re-machine bore")
            .with(fields::CUSTOMER_NOTIFICATION, "no")
            .with(fields::DRAWING_UPDATE, "yes")
            .with(fields::ENGINEER_NAME, "R. Osei")
            .with(fields::ENGINEER_DATE, "2026-03-16");
        let report = validate_engineering(&form);
        assert_eq!(report.len(), 2);
        assert!(report.has_error(fields::ORIGINAL_REVISION));
        assert!(report.has_error(fields::UPDATED_REVISION));
    }

    #[test]
    fn summary_lists_each_field() {
        let mut report = ValidationReport::new();
        assert_eq!(report.summary(), "");
        report.add(fields::RMA_NUMBER, MSG_REQUIRED);
        report.add(fields::RMA_NUMBER, MSG_CHOICE);
        assert_eq!(
            report.summary(),
            "Please complete all the required fields:\n- rmaNumber: This field is required."
        );
    }
}
