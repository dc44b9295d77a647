//! PDF encoding of a [`Report`] on US Letter pages.

use std::io::BufWriter;

use printpdf::{IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use super::chart::{self, rgb};
use super::{wrap_text, Report, ReportError, Section, DISCLAIMER};
use crate::config::{APP_VERSION, MODEL_ACCURACY, MODEL_ARCHITECTURE};
use crate::models::ImagePrediction;

const PAGE_WIDTH: Mm = Mm(215.9);
const PAGE_HEIGHT: Mm = Mm(279.4);
const MARGIN: Mm = Mm(20.0);
const BOTTOM: Mm = Mm(20.0);
const CONTENT_WIDTH: Mm = Mm(215.9 - 40.0);
const LINE: Mm = Mm(5.5);
/// Space a section heading needs, rule and trailing gap included.
const HEADING_HEIGHT: Mm = Mm(14.0);

/// Writes top to bottom, starting a new page when the next block would run
/// past the bottom margin.
struct PageCursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    y: Mm,
    font: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PageCursor {
    fn new(title: &str) -> Result<Self, ReportError> {
        let (doc, page, layer) = PdfDocument::new(title, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let font = doc
            .add_builtin_font(printpdf::BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Font(e.to_string()))?;
        let bold = doc
            .add_builtin_font(printpdf::BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Font(e.to_string()))?;
        Ok(Self {
            doc,
            layer,
            y: PAGE_HEIGHT - MARGIN,
            font,
            bold,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn ensure(&mut self, needed: Mm) {
        if self.y - needed < BOTTOM {
            self.new_page();
        }
    }

    fn gap(&mut self, h: f32) {
        self.y -= Mm(h);
    }

    fn heading(&mut self, text: &str) {
        self.heading_keeping(text, Mm(0.0));
    }

    /// Heading kept on the same page as the first `keep` of its body.
    fn heading_keeping(&mut self, text: &str, keep: Mm) {
        self.ensure(HEADING_HEIGHT + keep);
        self.gap(4.0);
        self.layer.set_fill_color(rgb(chart::HEADER_BLUE));
        self.layer.use_text(text, 13.0, MARGIN, self.y, &self.bold);
        self.gap(2.0);
        chart::stroke_line(
            &self.layer,
            (MARGIN, self.y),
            (MARGIN + CONTENT_WIDTH, self.y),
            0.8,
            chart::HEADER_BLUE,
        );
        self.gap(6.0);
    }

    /// Two-column label/value row.
    fn field(&mut self, label: &str, value: &str) {
        self.ensure(LINE);
        self.layer.set_fill_color(rgb(chart::TEXT_MUTED));
        self.layer.use_text(label, 10.0, MARGIN, self.y, &self.bold);
        self.layer.set_fill_color(rgb(chart::TEXT_DARK));
        self.layer.use_text(value, 10.0, MARGIN + Mm(62.0), self.y, &self.font);
        self.y -= LINE;
    }

    fn paragraph(&mut self, text: &str, size: f32, max_chars: usize) {
        self.layer.set_fill_color(rgb(chart::TEXT_DARK));
        for line in wrap_text(text, max_chars) {
            self.ensure(Mm(4.5));
            self.layer.use_text(&line, size, MARGIN, self.y, &self.font);
            self.gap(4.5);
        }
    }

    fn finish(self) -> Result<Vec<u8>, ReportError> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| ReportError::Save(e.to_string()))?;
        buf.into_inner()
            .map_err(|e| ReportError::Save(format!("buffer: {e}")))
    }
}

fn present_absent(flag: bool) -> &'static str {
    if flag {
        "Present"
    } else {
        "Absent"
    }
}

fn positive_negative(flag: bool) -> &'static str {
    if flag {
        "Positive"
    } else {
        "Negative"
    }
}

/// Render the report as PDF bytes.
pub fn render_pdf(report: &Report) -> Result<Vec<u8>, ReportError> {
    let mut cursor = PageCursor::new(&format!("Medical Report {}", report.report_id))?;

    for section in report.sections() {
        match section {
            Section::Header => header(&mut cursor),
            Section::Metadata => {
                cursor.field("Report Generated:", &report.generated_label());
                cursor.field("Report ID:", &report.report_id);
                cursor.field("Model Accuracy:", MODEL_ACCURACY);
            }
            Section::Demographics => {
                let p = &report.patient;
                cursor.heading("PATIENT DEMOGRAPHICS");
                cursor.field("Full Name:", p.name.trim());
                cursor.field("Age:", &format!("{} years", p.age));
                cursor.field("Gender:", p.gender.as_str());
                cursor.field("Assessment Date:", &report.assessment_date());
            }
            Section::ClinicalPresentation => {
                let p = &report.patient;
                cursor.heading("CLINICAL PRESENTATION");
                cursor.field("Pyrexia (Fever):", present_absent(p.fever));
                cursor.field("Persistent Cough:", present_absent(p.cough));
                cursor.field("Dyspnea:", present_absent(p.breathing_difficulty));
                cursor.field("Symptom Duration:", &format!("{} days", p.symptom_days));
            }
            Section::MedicalHistory => {
                let p = &report.patient;
                cursor.heading("MEDICAL HISTORY");
                cursor.field("Tobacco Use:", positive_negative(p.smoker));
                cursor.field("Chronic Pulmonary Disease:", positive_negative(p.chronic_condition));
            }
            Section::RiskAssessment => risk_section(&mut cursor, report),
            Section::SymptomProfile => {
                let indicators = report.patient.indicators();
                cursor.heading_keeping(
                    "SYMPTOM PROFILE",
                    chart::symptom_chart_height(indicators.len()),
                );
                cursor.y = chart::draw_symptom_chart(
                    &cursor.layer,
                    MARGIN,
                    cursor.y,
                    CONTENT_WIDTH,
                    &indicators,
                    &cursor.font,
                    &cursor.bold,
                );
            }
            Section::XrayAnalysis => {
                if let Some(prediction) = &report.prediction {
                    xray_section(&mut cursor, prediction);
                }
            }
            Section::Disclaimer => disclaimer(&mut cursor),
            Section::Footer => {
                cursor.ensure(Mm(10.0));
                cursor.gap(6.0);
                cursor.layer.set_fill_color(rgb(chart::TEXT_MUTED));
                cursor.layer.use_text(
                    format!("Pneumonia Detection System v{APP_VERSION}"),
                    8.0,
                    MARGIN,
                    cursor.y,
                    &cursor.font,
                );
            }
        }
    }

    cursor.finish()
}

fn header(cursor: &mut PageCursor) {
    let band = Mm(26.0);
    chart::fill_rect(
        &cursor.layer,
        Mm(0.0),
        PAGE_HEIGHT - band,
        PAGE_WIDTH,
        band,
        chart::HEADER_BLUE,
    );
    cursor.layer.set_fill_color(rgb(chart::WHITE));
    cursor.layer.use_text(
        "PNEUMONIA DETECTION SYSTEM",
        18.0,
        MARGIN,
        PAGE_HEIGHT - Mm(13.0),
        &cursor.bold,
    );
    cursor.layer.use_text(
        "Medical Analysis Report",
        11.0,
        MARGIN,
        PAGE_HEIGHT - Mm(20.0),
        &cursor.font,
    );
    cursor.y = PAGE_HEIGHT - band - Mm(10.0);
}

fn risk_section(cursor: &mut PageCursor, report: &Report) {
    let assessment = &report.assessment;
    cursor.heading_keeping("PNEUMONIA RISK ASSESSMENT", chart::GAUGE_HEIGHT);
    cursor.y = chart::draw_risk_gauge(
        &cursor.layer,
        MARGIN,
        cursor.y,
        CONTENT_WIDTH,
        assessment.score,
        assessment.category,
        &cursor.font,
        &cursor.bold,
    );

    let message = assessment.recommendation().message();
    let lines = wrap_text(message, 85);
    let box_height = Mm(8.0 + lines.len() as f32 * 5.0);
    cursor.ensure(box_height + Mm(4.0));
    chart::fill_rect(
        &cursor.layer,
        MARGIN,
        cursor.y - box_height,
        CONTENT_WIDTH,
        box_height,
        chart::category_box_color(assessment.category),
    );
    cursor.layer.set_fill_color(rgb(chart::WHITE));
    let mut y = cursor.y - Mm(6.0);
    for line in &lines {
        cursor
            .layer
            .use_text(line, 10.0, MARGIN + Mm(4.0), y, &cursor.bold);
        y -= Mm(5.0);
    }
    cursor.y -= box_height + Mm(4.0);

    if !assessment.factors.is_empty() {
        cursor.ensure(LINE);
        cursor.layer.set_fill_color(rgb(chart::TEXT_MUTED));
        cursor
            .layer
            .use_text("Contributing factors:", 9.0, MARGIN, cursor.y, &cursor.bold);
        cursor.y -= LINE;
        for factor in &assessment.factors {
            cursor.ensure(Mm(4.5));
            cursor.layer.set_fill_color(rgb(chart::TEXT_DARK));
            cursor.layer.use_text(
                format!("- {} (+{})", factor.label(), factor.points()),
                9.0,
                MARGIN + Mm(4.0),
                cursor.y,
                &cursor.font,
            );
            cursor.gap(4.5);
        }
    }
}

fn xray_section(cursor: &mut PageCursor, prediction: &ImagePrediction) {
    cursor.new_page();
    cursor.heading("CHEST X-RAY ANALYSIS");
    cursor.field(
        "AI Interpretation:",
        &prediction.label.as_str().to_uppercase(),
    );
    cursor.field("Confidence:", &format!("{:.2}%", prediction.confidence));
    cursor.field(
        "Normal Probability:",
        &format!("{:.2}%", prediction.normal_probability),
    );
    cursor.field(
        "Pneumonia Probability:",
        &format!("{:.2}%", prediction.pneumonia_probability),
    );
    cursor.field("Model Architecture:", MODEL_ARCHITECTURE);
    cursor.field("Training Accuracy:", MODEL_ACCURACY);
    cursor.gap(2.0);
    cursor.paragraph(prediction.interpretation(), 10.0, 90);
}

fn disclaimer(cursor: &mut PageCursor) {
    let lines = wrap_text(DISCLAIMER, 100);
    let box_height = Mm(12.0 + lines.len() as f32 * 4.2);
    cursor.ensure(box_height + Mm(6.0));
    cursor.gap(6.0);

    chart::fill_rect(
        &cursor.layer,
        MARGIN,
        cursor.y - box_height,
        CONTENT_WIDTH,
        box_height,
        0xfff3e0,
    );
    let mut y = cursor.y - Mm(6.0);
    cursor.layer.set_fill_color(rgb(chart::TEXT_DARK));
    cursor
        .layer
        .use_text("MEDICAL DISCLAIMER", 10.0, MARGIN + Mm(4.0), y, &cursor.bold);
    y -= Mm(5.0);
    for line in &lines {
        cursor
            .layer
            .use_text(line, 8.0, MARGIN + Mm(4.0), y, &cursor.font);
        y -= Mm(4.2);
    }
    cursor.y -= box_height;
}
