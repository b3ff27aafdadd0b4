use thiserror::Error;

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("no image has been uploaded for this session")]
    NoImage,

    #[error("pending edits must be applied or discarded before saving")]
    UnappliedEdits,

    #[error("a title is required to save")]
    MissingTitle,

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("staging error: {0}")]
    Stager(#[from] retouch_stager::StagerError),

    #[error("ledger error: {0}")]
    Ledger(#[from] retouch_ledger::LedgerError),

    #[error("descriptor error: {0}")]
    Descriptor(#[from] retouch_descriptor::DescriptorError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("registry error: {0}")]
    Registry(#[from] retouch_registry::RegistryError),

    #[error("invalid input: {0}")]
    Types(#[from] retouch_types::TypeError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SdkError {
    /// Whether the failure was the credit gate refusing a commit.
    pub fn is_insufficient_credit(&self) -> bool {
        matches!(
            self,
            Self::Stager(retouch_stager::StagerError::InsufficientCredit { .. })
        )
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
