//! `POST /api/xray`: classify one uploaded chest X-ray.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::form::read_upload;
use crate::api::types::{ApiContext, XrayResponse};
use crate::core_state::CoreState;
use crate::models::ImagePrediction;

pub async fn classify(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<XrayResponse>, ApiError> {
    let form = read_upload(&mut multipart, ctx.core.config.max_upload_bytes).await?;
    let image = form
        .image
        .ok_or_else(|| ApiError::BadRequest("No file provided.".into()))?;

    let prediction = classify_image(ctx.core.clone(), image).await?;
    Ok(Json(XrayResponse::from(prediction)))
}

/// Load the classifier if needed and run one prediction on the blocking pool.
pub(crate) async fn classify_image(
    core: Arc<CoreState>,
    image: Vec<u8>,
) -> Result<ImagePrediction, ApiError> {
    let prediction =
        tokio::task::spawn_blocking(move || core.classifier()?.predict(&image)).await??;
    Ok(prediction)
}
