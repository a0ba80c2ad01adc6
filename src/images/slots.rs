use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

const MB: usize = 1024 * 1024;

const RASTER: &[&str] = &["image/jpeg", "image/png", "image/webp"];
const RASTER_GIF: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Where an uploaded image is going to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Banner,
    Content,
    Thumbnail,
    Avatar,
    Background,
}

impl Slot {
    pub const ALL: [Slot; 5] = [
        Slot::Banner,
        Slot::Content,
        Slot::Thumbnail,
        Slot::Avatar,
        Slot::Background,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Banner => "banner",
            Slot::Content => "content",
            Slot::Thumbnail => "thumbnail",
            Slot::Avatar => "avatar",
            Slot::Background => "background",
        }
    }

    pub fn policy(&self) -> SlotPolicy {
        match self {
            Slot::Banner => SlotPolicy {
                min_width: 1200,
                max_width: 4000,
                min_height: 400,
                max_height: 2000,
                max_size: 5 * MB,
                allowed_types: RASTER,
                transform: Transform::fill(1200, 630),
            },
            Slot::Content => SlotPolicy {
                min_width: 400,
                max_width: 3000,
                min_height: 300,
                max_height: 3000,
                max_size: 3 * MB,
                allowed_types: RASTER_GIF,
                transform: Transform::limit(800, 600),
            },
            Slot::Thumbnail => SlotPolicy {
                min_width: 300,
                max_width: 1500,
                min_height: 200,
                max_height: 1500,
                max_size: 2 * MB,
                allowed_types: RASTER,
                transform: Transform::fill(400, 300),
            },
            Slot::Avatar => SlotPolicy {
                min_width: 100,
                max_width: 1000,
                min_height: 100,
                max_height: 1000,
                max_size: MB,
                allowed_types: RASTER,
                transform: Transform {
                    gravity: Some("face"),
                    ..Transform::fill(200, 200)
                },
            },
            Slot::Background => SlotPolicy {
                min_width: 1280,
                max_width: 5000,
                min_height: 720,
                max_height: 5000,
                max_size: 8 * MB,
                allowed_types: RASTER,
                transform: Transform::fill(1920, 1080),
            },
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Slot::ALL
            .into_iter()
            .find(|slot| slot.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = Slot::ALL.iter().map(Slot::as_str).collect();
                format!(
                    "Unknown image type '{}'. Expected one of: {}",
                    s.trim(),
                    names.join(", ")
                )
            })
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPolicy {
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    /// Bytes.
    pub max_size: usize,
    pub allowed_types: &'static [&'static str],
    pub transform: Transform,
}

impl SlotPolicy {
    pub fn max_size_mb(&self) -> usize {
        self.max_size / MB
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    /// Cover the target box exactly, cropping overflow.
    Fill,
    /// Shrink to fit inside the target box; never enlarge.
    Limit,
}

/// Delivery-time resize the media host applies to a stored image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transform {
    pub width: u32,
    pub height: u32,
    pub crop: Crop,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity: Option<&'static str>,
}

impl Transform {
    pub const fn fill(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            crop: Crop::Fill,
            gravity: None,
        }
    }

    pub const fn limit(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            crop: Crop::Limit,
            gravity: None,
        }
    }

    /// Dimensions of the delivered image for a source of `width` x `height`.
    pub fn output_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        match self.crop {
            Crop::Fill => (self.width, self.height),
            Crop::Limit => {
                if width <= self.width && height <= self.height {
                    return (width, height);
                }
                let scale = f64::min(
                    self.width as f64 / width as f64,
                    self.height as f64 / height as f64,
                );
                let w = ((width as f64 * scale).round() as u32).max(1);
                let h = ((height as f64 * scale).round() as u32).max(1);
                (w, h)
            }
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let crop = match self.crop {
            Crop::Fill => "fill",
            Crop::Limit => "limit",
        };
        write!(f, "w_{},h_{},c_{}", self.width, self.height, crop)?;
        if let Some(g) = self.gravity {
            write!(f, ",g_{g}")?;
        }
        f.write_str(",f_auto")
    }
}

/// Every slot keyed by name, as served to upload forms.
pub fn table() -> BTreeMap<&'static str, SlotPolicy> {
    Slot::ALL.iter().map(|s| (s.as_str(), s.policy())).collect()
}
