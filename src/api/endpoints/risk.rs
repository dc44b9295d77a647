//! `POST /api/risk`: score a patient from JSON.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::RiskResponse;
use crate::models::PatientInput;
use crate::risk::RiskAssessment;

pub async fn assess(
    payload: Result<Json<PatientInput>, JsonRejection>,
) -> Result<Json<RiskResponse>, ApiError> {
    let Json(patient) = payload?;
    patient.validate()?;

    let assessment = RiskAssessment::from_patient(&patient);
    tracing::debug!(
        score = assessment.score,
        category = %assessment.category,
        "Risk assessed"
    );
    Ok(Json(RiskResponse::from(&assessment)))
}
