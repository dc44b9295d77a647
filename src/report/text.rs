use super::Report;

const RULE: &str = "═══════════════════════════════════════════════════════════════";

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Render the plain-text summary. Output depends only on the report's
/// contents, so a frozen timestamp gives byte-identical text.
pub fn render_text(report: &Report) -> String {
    let p = &report.patient;
    let a = &report.assessment;

    let mut lines: Vec<String> = vec![
        RULE.into(),
        "PNEUMONIA DETECTION SYSTEM - MEDICAL REPORT".into(),
        RULE.into(),
        String::new(),
        format!("Report ID: {}", report.report_id),
        format!("Generated: {}", report.generated_at.format("%Y-%m-%d %H:%M:%S")),
        String::new(),
        "PATIENT INFORMATION".into(),
        format!("Name: {}", p.name.trim()),
        format!("Age: {} years", p.age),
        format!("Gender: {}", p.gender),
        String::new(),
        "CLINICAL PRESENTATION".into(),
        format!("Fever: {}", yes_no(p.fever)),
        format!("Cough: {}", yes_no(p.cough)),
        format!("Dyspnea: {}", yes_no(p.breathing_difficulty)),
        format!("Duration: {} days", p.symptom_days),
        String::new(),
        "MEDICAL HISTORY".into(),
        format!("Smoking History: {}", yes_no(p.smoker)),
        format!("Chronic Lung Disease: {}", yes_no(p.chronic_condition)),
        String::new(),
        "RISK ASSESSMENT".into(),
        format!("Risk Score: {}/100", a.score),
        format!("Category: {}", a.category),
        format!("Recommendation: {}", a.recommendation().message()),
    ];

    if a.factors.is_empty() {
        lines.push("Contributing Factors: none (minimal risk factors)".into());
    } else {
        lines.push("Contributing Factors:".into());
        lines.extend(
            a.factors
                .iter()
                .map(|f| format!("  - {} (+{})", f.label(), f.points())),
        );
    }
    lines.push(String::new());

    if let Some(pred) = &report.prediction {
        lines.extend([
            "X-RAY ANALYSIS".into(),
            format!("Prediction: {}", pred.label.as_str().to_uppercase()),
            format!("Confidence: {:.2}%", pred.confidence),
            format!("Normal Probability: {:.2}%", pred.normal_probability),
            format!("Pneumonia Probability: {:.2}%", pred.pneumonia_probability),
            format!("Interpretation: {}", pred.interpretation()),
            String::new(),
        ]);
    }

    lines.push("AI-assisted analysis. Requires professional validation.".into());
    lines.push(RULE.into());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
