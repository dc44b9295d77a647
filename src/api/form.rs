//! Multipart form parsing for the upload routes.
//!
//! Text parts carry the patient fields, a part named `file` carries the
//! optional X-ray image. Unknown parts are ignored. A `file` part with no
//! bytes (a browser form submitted without choosing a file) counts as absent.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::api::error::ApiError;
use crate::config::parse_bool;
use crate::models::{PatientInput, ValidationError};

pub const FILE_FIELD: &str = "file";

/// Raw parts of an upload, before interpretation.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub image: Option<Vec<u8>>,
}

/// Drain the multipart stream, rejecting an image over `max_image_bytes`.
pub async fn read_upload(
    multipart: &mut Multipart,
    max_image_bytes: usize,
) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        if name == FILE_FIELD {
            let bytes = field.bytes().await?;
            if bytes.len() > max_image_bytes {
                return Err(ApiError::PayloadTooLarge(format!(
                    "Image too large. Maximum {}MB.",
                    max_image_bytes / (1024 * 1024)
                )));
            }
            if !bytes.is_empty() {
                form.image = Some(bytes.to_vec());
            }
        } else if !name.is_empty() {
            let text = field.text().await?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}

fn flag(fields: &HashMap<String, String>, name: &str) -> Result<bool, ValidationError> {
    match fields.get(name) {
        None => Ok(false),
        Some(raw) if raw.trim().is_empty() => Ok(false),
        Some(raw) => parse_bool(raw).ok_or_else(|| ValidationError::Malformed {
            field: name.to_string(),
            expected: "boolean",
            value: raw.clone(),
        }),
    }
}

fn number(fields: &HashMap<String, String>, name: &str) -> Result<u32, ValidationError> {
    match fields.get(name) {
        None => Ok(0),
        Some(raw) if raw.trim().is_empty() => Ok(0),
        Some(raw) => raw.trim().parse().map_err(|_| ValidationError::Malformed {
            field: name.to_string(),
            expected: "non-negative integer",
            value: raw.clone(),
        }),
    }
}

/// Interpret the text parts as a [`PatientInput`]. Absent parts take the
/// same defaults as a JSON body: empty name, zero, false, gender `Other`.
pub fn patient_from_fields(fields: &HashMap<String, String>) -> Result<PatientInput, ValidationError> {
    let gender = match fields.get("gender").map(|g| g.trim()) {
        None | Some("") => Default::default(),
        Some(raw) => raw.parse()?,
    };

    Ok(PatientInput {
        name: fields.get("name").map(|n| n.trim().to_string()).unwrap_or_default(),
        age: number(fields, "age")?,
        gender,
        fever: flag(fields, "fever")?,
        cough: flag(fields, "cough")?,
        breathing_difficulty: flag(fields, "breathing_difficulty")?,
        smoker: flag(fields, "smoker")?,
        chronic_condition: flag(fields, "chronic_condition")?,
        symptom_days: number(fields, "symptom_days")?,
    })
}
