use anyhow::Context;
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::IngestedImage;
use super::slots::{Slot, SlotPolicy};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// An upload that passed every check for its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedImage {
    pub slot: Slot,
    pub width: u32,
    pub height: u32,
}

/// Lowercases, drops parameters and folds the `image/jpg` alias.
fn normalize_mime(mime: &str) -> String {
    let base = mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    if base == "image/jpg" {
        "image/jpeg".to_string()
    } else {
        base
    }
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

fn check_dimension(actual: u32, min: u32, max: u32, what: &str, slot: Slot) -> ApiResult<()> {
    if actual < min {
        return Err(ApiError::validation(format!(
            "Image {what} {actual}px is below the minimum of {min}px for {slot} images"
        )));
    }
    if actual > max {
        return Err(ApiError::validation(format!(
            "Image {what} {actual}px exceeds the maximum of {max}px for {slot} images"
        )));
    }
    Ok(())
}

/// Checks in order: slot, byte size, MIME type, decodability, pixel bounds.
pub fn validate(bytes: &[u8], mime: &str, slot: &str) -> ApiResult<ValidatedImage> {
    let slot: Slot = slot.parse().map_err(ApiError::Validation)?;
    let policy: SlotPolicy = slot.policy();

    if bytes.len() > policy.max_size {
        return Err(ApiError::validation(format!(
            "File size {:.2}MB exceeds the {}MB limit for {slot} images",
            bytes.len() as f64 / (1024.0 * 1024.0),
            policy.max_size_mb()
        )));
    }

    let mime = normalize_mime(mime);
    if !policy.allowed_types.contains(&mime.as_str()) {
        return Err(ApiError::validation(format!(
            "Unsupported file type '{mime}' for {slot} images. Allowed: {}",
            policy.allowed_types.join(", ")
        )));
    }

    let size = imagesize::blob_size(bytes)
        .map_err(|_| ApiError::validation("Could not read image dimensions"))?;
    let width = u32::try_from(size.width).unwrap_or(u32::MAX);
    let height = u32::try_from(size.height).unwrap_or(u32::MAX);

    check_dimension(width, policy.min_width, policy.max_width, "width", slot)?;
    check_dimension(height, policy.min_height, policy.max_height, "height", slot)?;

    Ok(ValidatedImage {
        slot,
        width,
        height,
    })
}

/// Validates, stores the raw bytes with the slot's transform and reports
/// the delivered image.
pub async fn ingest(state: &AppState, body: Bytes, mime: &str, slot: &str) -> ApiResult<IngestedImage> {
    let checked = match validate(&body, mime, slot) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, %slot, size = body.len(), "image rejected");
            return Err(e);
        }
    };

    let policy = checked.slot.policy();
    let mime = normalize_mime(mime);
    let ext = ext_from_mime(&mime).unwrap_or("bin");
    let key = format!("blog/{}/{}.{}", checked.slot, Uuid::new_v4(), ext);
    let size = body.len();

    state
        .storage
        .put_object(&key, body, &mime, &policy.transform)
        .await
        .with_context(|| format!("put_object {}", key))?;

    let (width, height) = policy
        .transform
        .output_dimensions(checked.width, checked.height);
    let url = state.storage.public_url(&key, &policy.transform);

    info!(%key, slot = %checked.slot, size, "image stored");
    Ok(IngestedImage {
        url,
        public_id: key,
        width,
        height,
        bytes: size,
        format: ext.to_string(),
        slot: checked.slot,
    })
}
