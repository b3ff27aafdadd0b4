/// Errors from descriptor derivation and fingerprinting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    /// The image has no source identifier to render from.
    #[error("image has no public id")]
    MissingPublicId,

    /// The committed `fill.aspectRatio` is not one of the presets.
    #[error("unknown aspect ratio: {0}")]
    UnknownAspectRatio(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type DescriptorResult<T> = Result<T, DescriptorError>;
