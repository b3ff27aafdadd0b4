use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown transformation type: {0}")]
    UnknownTransformationType(String),

    #[error("unknown aspect ratio: {0}")]
    UnknownAspectRatio(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}
