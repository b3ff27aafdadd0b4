use retouch_registry::RegistryError;

/// Errors produced by validated merges.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// The merged configuration does not conform to the registry shapes.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] RegistryError),
}
