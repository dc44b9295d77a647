//! Report downloads.
//!
//! `POST /api/report/pdf` and `POST /api/report/text` take the patient fields
//! as multipart text parts plus an optional `file` image. If the image cannot
//! be analysed the report is still produced, without the X-ray section.

use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::api::endpoints::xray::classify_image;
use crate::api::error::ApiError;
use crate::api::form::{patient_from_fields, read_upload};
use crate::api::types::ApiContext;
use crate::report::{self, pdf::render_pdf, text::render_text, Report};
use crate::risk::RiskAssessment;

async fn compose_from_upload(ctx: &ApiContext, mut multipart: Multipart) -> Result<Report, ApiError> {
    let form = read_upload(&mut multipart, ctx.core.config.max_upload_bytes).await?;
    let patient = patient_from_fields(&form.fields)?;
    patient.validate_for_report()?;

    let assessment = RiskAssessment::from_patient(&patient);

    let prediction = match form.image {
        Some(image) => match classify_image(ctx.core.clone(), image).await {
            Ok(prediction) => Some(prediction),
            Err(e) => {
                tracing::warn!(error = %e, "X-ray analysis skipped for report");
                None
            }
        },
        None => None,
    };

    Ok(report::compose(&patient, &assessment, prediction.as_ref()))
}

pub async fn pdf(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let report = compose_from_upload(&ctx, multipart).await?;
    let filename = report.pdf_filename();
    let report_id = report.report_id.clone();

    let bytes = tokio::task::spawn_blocking(move || render_pdf(&report)).await??;
    tracing::info!(report_id = %report_id, size = bytes.len(), "PDF report generated");

    Ok(attachment("application/pdf", &filename, bytes))
}

pub async fn text(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let report = compose_from_upload(&ctx, multipart).await?;
    let body = render_text(&report);
    tracing::info!(report_id = %report.report_id, "Text report generated");

    Ok(attachment(
        "text/plain; charset=utf-8",
        &report.text_filename(),
        body.into_bytes(),
    ))
}

fn attachment(content_type: &'static str, filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(filename)),
        ],
        body,
    )
        .into_response()
}

/// `attachment` disposition with an ASCII fallback name and the exact UTF-8
/// name in RFC 5987 `filename*` form. The fallback drops non-ASCII characters
/// and replaces spaces, controls, quotes and backslashes with `_`.
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();

    let mut encoded = String::with_capacity(filename.len());
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
