//! Report composition: patient data, risk assessment and the optional X-ray
//! verdict assembled into a downloadable document.
//!
//! Two encodings of the same facts:
//! 1. PDF: paginated, with the risk gauge and symptom chart (`pdf`)
//! 2. Plain text: same facts, no visuals (`text`)
//!
//! A `Report` is built per download and dropped after the response is sent.
//! Apart from the timestamp (and the report id derived from it) the content
//! is a pure function of the inputs.

pub mod chart;
pub mod pdf;
pub mod text;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

use crate::models::{ImagePrediction, PatientInput};
use crate::risk::RiskAssessment;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("PDF font error: {0}")]
    Font(String),

    #[error("PDF save error: {0}")]
    Save(String),
}

/// Document sections in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Header,
    Metadata,
    Demographics,
    ClinicalPresentation,
    MedicalHistory,
    RiskAssessment,
    SymptomProfile,
    XrayAnalysis,
    Disclaimer,
    Footer,
}

pub const DISCLAIMER: &str = "This report is generated by an AI-assisted clinical decision support \
system. All diagnostic findings and treatment recommendations must be reviewed and validated by a \
qualified, licensed healthcare professional. This technology is intended to augment, not replace, \
clinical judgment. The system is for research and educational purposes only and is not approved \
for clinical diagnostic use.";

/// Immutable snapshot of everything a report shows.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub report_id: String,
    pub generated_at: NaiveDateTime,
    pub patient: PatientInput,
    pub assessment: RiskAssessment,
    pub prediction: Option<ImagePrediction>,
}

/// Compose a report stamped with the current local time.
pub fn compose(
    patient: &PatientInput,
    assessment: &RiskAssessment,
    prediction: Option<&ImagePrediction>,
) -> Report {
    compose_at(patient, assessment, prediction, Local::now().naive_local())
}

/// Compose a report with a fixed timestamp.
pub fn compose_at(
    patient: &PatientInput,
    assessment: &RiskAssessment,
    prediction: Option<&ImagePrediction>,
    generated_at: NaiveDateTime,
) -> Report {
    Report {
        report_id: report_id(&generated_at),
        generated_at,
        patient: patient.clone(),
        assessment: assessment.clone(),
        prediction: prediction.copied(),
    }
}

/// `RPT-YYYYMMDDHHMMSS`
pub fn report_id(at: &NaiveDateTime) -> String {
    format!("RPT-{}", at.format("%Y%m%d%H%M%S"))
}

impl Report {
    /// Sections present in this report. The X-ray section exists only when a
    /// prediction was produced.
    pub fn sections(&self) -> Vec<Section> {
        let mut sections = vec![
            Section::Header,
            Section::Metadata,
            Section::Demographics,
            Section::ClinicalPresentation,
            Section::MedicalHistory,
            Section::RiskAssessment,
            Section::SymptomProfile,
        ];
        if self.prediction.is_some() {
            sections.push(Section::XrayAnalysis);
        }
        sections.push(Section::Disclaimer);
        sections.push(Section::Footer);
        sections
    }

    /// e.g. `October 17, 2026 at 14:03:09`
    pub fn generated_label(&self) -> String {
        self.generated_at.format("%B %d, %Y at %H:%M:%S").to_string()
    }

    pub fn assessment_date(&self) -> String {
        self.generated_at.format("%Y-%m-%d").to_string()
    }

    /// `medical_report_<name>_<YYYYMMDD>.pdf`
    pub fn pdf_filename(&self) -> String {
        format!(
            "medical_report_{}_{}.pdf",
            filename_safe(&self.patient.name),
            self.generated_at.format("%Y%m%d")
        )
    }

    /// `report_text_<name>_<YYYYMMDD>.txt`
    pub fn text_filename(&self) -> String {
        format!(
            "report_text_{}_{}.txt",
            filename_safe(&self.patient.name),
            self.generated_at.format("%Y%m%d")
        )
    }
}

/// Replace whitespace with `_` and drop characters that are unsafe in a
/// `Content-Disposition` filename or a path.
pub fn filename_safe(name: &str) -> String {
    name.trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}

/// Simple word-wrap helper for fixed-width rendering.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.chars().count() + word.chars().count() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
