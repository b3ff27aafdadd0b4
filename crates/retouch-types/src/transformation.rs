use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// One of the fixed image-edit operations an image can be configured with.
///
/// The declaration order is the canonical order: configurations iterate in
/// it and descriptors emit their segments in it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformationType {
    /// Generative restoration (denoise, remove artifacts).
    Restore,
    /// Background removal.
    RemoveBackground,
    /// Generative fill to a new aspect ratio.
    Fill,
    /// Prompted object removal.
    Remove,
    /// Prompted object recolor.
    Recolor,
}

impl TransformationType {
    /// Every transformation type, in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Restore,
        Self::RemoveBackground,
        Self::Fill,
        Self::Remove,
        Self::Recolor,
    ];

    /// The wire key for this type (e.g. `"removeBackground"`).
    pub fn key(&self) -> &'static str {
        match self {
            Self::Restore => "restore",
            Self::RemoveBackground => "removeBackground",
            Self::Fill => "fill",
            Self::Remove => "remove",
            Self::Recolor => "recolor",
        }
    }

    /// Types whose whole configuration is their default and which are
    /// staged automatically once an image is present.
    pub fn is_auto_seeded(&self) -> bool {
        matches!(self, Self::Restore | Self::RemoveBackground)
    }
}

impl fmt::Display for TransformationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TransformationType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| TypeError::UnknownTransformationType(s.to_string()))
    }
}
