use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use retouch_types::{AspectRatio, ImageAttributes, TransformationConfig, TransformationType};

use crate::error::{DescriptorError, DescriptorResult};
use crate::hasher::Fingerprinter;

/// Field of the `fill` parameters that selects an aspect-ratio preset.
pub const ASPECT_RATIO_FIELD: &str = "aspectRatio";

/// Everything the rendering service needs to produce the edited image.
///
/// Carries no timestamps or random tokens: equal inputs give equal
/// descriptors, byte for byte.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    pub public_id: String,
    pub width: u32,
    pub height: u32,
    /// One parameter object per configured transformation type.
    pub transformations: TransformationConfig,
}

impl RequestDescriptor {
    /// Hex BLAKE3 digest of the descriptor's canonical JSON.
    pub fn fingerprint(&self) -> DescriptorResult<String> {
        Fingerprinter::DESCRIPTOR.hash_json(self)
    }

    /// Canonical JSON encoding.
    pub fn to_canonical_json(&self) -> DescriptorResult<String> {
        serde_json::to_string(self).map_err(|e| DescriptorError::Serialization(e.to_string()))
    }

    pub fn has(&self, ty: TransformationType) -> bool {
        self.transformations.contains(ty)
    }
}

/// Derive the descriptor for `attrs` under the committed configuration.
///
/// Target dimensions come from the attributes unless the committed `fill`
/// parameters name an aspect-ratio preset, in which case the preset wins.
pub fn derive(
    attrs: &ImageAttributes,
    committed: &TransformationConfig,
) -> DescriptorResult<RequestDescriptor> {
    if attrs.public_id.trim().is_empty() {
        return Err(DescriptorError::MissingPublicId);
    }

    let (width, height) = match committed.field(TransformationType::Fill, ASPECT_RATIO_FIELD) {
        Some(Value::String(key)) => {
            let ratio = AspectRatio::from_key(key)
                .map_err(|_| DescriptorError::UnknownAspectRatio(key.clone()))?;
            (ratio.width, ratio.height)
        }
        _ => (attrs.width, attrs.height),
    };

    debug!(public_id = %attrs.public_id, width, height, types = committed.len(), "descriptor derived");
    Ok(RequestDescriptor {
        public_id: attrs.public_id.clone(),
        width,
        height,
        transformations: committed.clone(),
    })
}
