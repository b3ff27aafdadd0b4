use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A selectable aspect-ratio preset and the target size it implies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AspectRatio {
    /// Preset key, e.g. `"3:4"`.
    pub key: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub const SQUARE: Self = Self {
        key: "1:1",
        label: "Square (1:1)",
        width: 1000,
        height: 1000,
    };
    pub const STANDARD_PORTRAIT: Self = Self {
        key: "3:4",
        label: "Standard Portrait (3:4)",
        width: 1000,
        height: 1334,
    };
    pub const PHONE_PORTRAIT: Self = Self {
        key: "9:16",
        label: "Phone Portrait (9:16)",
        width: 1000,
        height: 1778,
    };

    /// Every preset, in the order they are offered.
    pub const ALL: [Self; 3] = [Self::SQUARE, Self::STANDARD_PORTRAIT, Self::PHONE_PORTRAIT];

    /// Look up a preset by key.
    pub fn from_key(key: &str) -> Result<Self, TypeError> {
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.key == key)
            .ok_or_else(|| TypeError::UnknownAspectRatio(key.to_string()))
    }
}

/// Intrinsic attributes of the image being edited.
///
/// These are independent of the transformation configuration; only an
/// aspect-ratio selection changes them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttributes {
    /// Source identifier understood by the rendering service.
    pub public_id: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    /// URL of the original upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_url: Option<String>,
}

impl ImageAttributes {
    pub fn new(public_id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            public_id: public_id.into(),
            width,
            height,
            aspect_ratio: None,
            secure_url: None,
        }
    }

    pub fn with_secure_url(mut self, url: impl Into<String>) -> Self {
        self.secure_url = Some(url.into());
        self
    }

    /// Resize the target to the preset's dimensions and remember its key.
    pub fn apply_aspect_ratio(&mut self, ratio: &AspectRatio) {
        self.width = ratio.width;
        self.height = ratio.height;
        self.aspect_ratio = Some(ratio.key.to_string());
    }
}
