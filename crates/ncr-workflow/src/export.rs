//! Report export
//!
//! A report always carries every section, regardless of which tab is
//! showing. Rendering is behind [`ReportRenderer`]; the crate ships a JSON
//! renderer and leaves document formats to callers.

use ncr_core::{stage_fields, NcrRecord, Section};
use serde::Serialize;

use crate::error::ExportError;

/// Page orientation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Document export settings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    /// Page margin in millimetres
    pub margin_mm: f64,
    pub format: String,
    pub orientation: Orientation,
    pub image_type: String,
    pub image_quality: f64,
    /// Render scale for the page capture
    pub scale: f64,
    pub page_break_modes: Vec<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            margin_mm: 5.0,
            format: "a4".to_string(),
            orientation: Orientation::Portrait,
            image_type: "jpeg".to_string(),
            image_quality: 0.98,
            scale: 2.0,
            page_break_modes: vec!["css".to_string(), "legacy".to_string()],
        }
    }
}

impl ExportOptions {
    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_margin(mut self, margin_mm: f64) -> Self {
        self.margin_mm = margin_mm;
        self
    }
}

/// `NCR_<number>.pdf`, or `NCR_Report.pdf` for an unnumbered record
#[must_use]
pub fn report_file_name(record: &NcrRecord) -> String {
    match record.number.as_deref().map(str::trim) {
        Some(number) if !number.is_empty() => format!("NCR_{number}.pdf"),
        _ => "NCR_Report.pdf".to_string(),
    }
}

/// One section of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub section: Section,
    pub title: &'static str,
    /// `(field, value)` in page order, blanks omitted
    pub fields: Vec<(String, String)>,
}

/// A record flattened for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub file_name: String,
    pub number: Option<String>,
    pub status: Option<String>,
    pub sections: Vec<ReportSection>,
}

impl Report {
    /// Report over every section of `record`
    #[must_use]
    pub fn from_record(record: &NcrRecord) -> Self {
        let sections = Section::ALL
            .into_iter()
            .map(|section| {
                let stage = section.stage();
                let form = record.to_form(stage);
                let fields = stage_fields(stage)
                    .iter()
                    .filter_map(|field| {
                        form.text(field).map(|value| ((*field).to_string(), value))
                    })
                    .collect();
                ReportSection {
                    section,
                    title: section_title(section),
                    fields,
                }
            })
            .collect();
        Self {
            file_name: report_file_name(record),
            number: record.number.clone(),
            status: record.status.clone(),
            sections,
        }
    }
}

fn section_title(section: Section) -> &'static str {
    match section {
        Section::Quality => "Quality Representative",
        Section::Engineering => "Engineering",
        Section::Procurement => "Purchasing / Operations",
        Section::Inspector => "Final Review",
    }
}

/// Turns a report into document bytes
pub trait ReportRenderer {
    /// Renders `report`
    ///
    /// # Errors
    /// Renderer-specific failures.
    fn render(&self, report: &Report, options: &ExportOptions) -> Result<Vec<u8>, ExportError>;

    /// File extension of the produced document
    fn extension(&self) -> &'static str;
}

/// Pretty-printed JSON of the report and its options
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportRenderer;

#[derive(Serialize)]
struct JsonDocument<'a> {
    options: &'a ExportOptions,
    report: &'a Report,
}

impl ReportRenderer for JsonReportRenderer {
    fn render(&self, report: &Report, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
        Ok(serde_json::to_vec_pretty(&JsonDocument { options, report })?)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_falls_back() {
        let mut record = NcrRecord::default();
        assert_eq!(report_file_name(&record), "NCR_Report.pdf");
        record.number = Some("NCR-2026-011".into());
        assert_eq!(report_file_name(&record), "NCR_NCR-2026-011.pdf");
    }

    #[test]
    fn defaults_match_print_layout() {
        let options = ExportOptions::default();
        assert_eq!(options.margin_mm, 5.0);
        assert_eq!(options.orientation, Orientation::Portrait);
        assert_eq!(options.page_break_modes, ["css", "legacy"]);
    }

    #[test]
    fn report_has_every_section() {
        let mut record = NcrRecord {
            number: Some("NCR-2026-011".into()),
            ..Default::default()
        };
        record.quality.supplier = Some("Acme".into());
        let report = Report::from_record(&record);
        assert_eq!(report.sections.len(), 4);
        assert!(report.sections[0]
            .fields
            .contains(&("supplierName".to_string(), "Acme".to_string())));
        assert!(report.sections[3].fields.is_empty());
    }

    #[test]
    fn json_renderer_embeds_options() {
        let report = Report::from_record(&NcrRecord::default());
        let bytes = JsonReportRenderer
            .render(&report, &ExportOptions::default())
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["options"]["imageQuality"], serde_json::json!(0.98));
        assert_eq!(value["report"]["fileName"], "NCR_Report.pdf");
    }

    #[test]
    fn landscape_with_wider_margin() {
        let options = ExportOptions::default()
            .with_orientation(Orientation::Landscape)
            .with_margin(12.5);
        let report = Report::from_record(&NcrRecord::default());
        let bytes = JsonReportRenderer.render(&report, &options).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["options"]["orientation"], "landscape");
        assert_eq!(value["options"]["marginMm"], serde_json::json!(12.5));
        assert_eq!(JsonReportRenderer.extension(), "json");
    }
}
