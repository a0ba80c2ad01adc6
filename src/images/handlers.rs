use std::collections::BTreeMap;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use tracing::instrument;

use super::dto::IngestedImage;
use super::services;
use super::slots::{self, SlotPolicy};
use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Above the largest slot limit so oversize files reach validation.
const UPLOAD_BODY_LIMIT: usize = 12 * 1024 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/upload/image", get(slot_table).post(upload_image))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}

#[instrument]
pub async fn slot_table() -> Json<BTreeMap<&'static str, SlotPolicy>> {
    Json(slots::table())
}

/// POST /upload/image (multipart): `file` plus `type` naming the slot.
#[instrument(skip(state, mp))]
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    mut mp: Multipart,
) -> ApiResult<(StatusCode, Json<IngestedImage>)> {
    let mut file: Option<(Bytes, String)> = None;
    let mut slot: Option<String> = None;

    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|_| ApiError::validation("Malformed multipart body"))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("file") | Some("image") => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::validation("Could not read uploaded file"))?;
                file = Some((data, content_type));
            }
            Some("type") | Some("slot") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::validation("Could not read image type"))?;
                slot = Some(text);
            }
            _ => {}
        }
    }

    let (data, content_type) = file.ok_or_else(|| ApiError::validation("No file provided"))?;
    let slot = slot
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::validation("Image type is required"))?;

    tracing::debug!(user_id = %user.id, %slot, size = data.len(), "upload received");
    let image = services::ingest(&state, data, &content_type, &slot).await?;
    Ok((StatusCode::CREATED, Json(image)))
}
