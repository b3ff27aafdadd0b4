//! Error types for the registry crate.

use retouch_types::TransformationType;

use crate::shape::FieldKind;

/// Errors that can occur during registry lookups and shape validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The key is not one of the closed set of transformation types.
    #[error("unknown transformation type: {0}")]
    UnknownType(String),

    /// A parameter object carries a field its type does not declare.
    #[error("field '{field}' is not declared for {ty}")]
    UndeclaredField {
        ty: TransformationType,
        field: String,
    },

    /// A declared field holds a value of the wrong kind.
    #[error("field '{field}' of {ty} must be {expected}")]
    KindMismatch {
        ty: TransformationType,
        field: String,
        expected: FieldKind,
    },
}

/// Convenience alias for registry results.
pub type RegistryResult<T> = Result<T, RegistryError>;
