use serde::Serialize;

use super::slots::Slot;

/// What the media host now serves for an accepted upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestedImage {
    pub url: String,
    pub public_id: String,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
    pub format: String,
    pub slot: Slot,
}
