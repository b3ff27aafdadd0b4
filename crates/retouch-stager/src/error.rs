use retouch_ledger::LedgerError;
use retouch_merge::MergeError;
use retouch_registry::RegistryError;

/// Errors produced by staging and commit operations.
///
/// Every failure leaves the committed configuration untouched. All but
/// [`StagerError::LedgerUnavailable`] also leave the pending delta exactly
/// as it was; after a ledger failure the pending delta holds the rolled
/// back snapshot plus anything staged while the debit was outstanding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StagerError {
    /// The type key is not one of the registered transformation types.
    #[error("unknown transformation type: {0}")]
    UnknownType(String),

    /// The merged configuration does not match the registry shapes.
    #[error("invalid configuration: {0}")]
    InvalidConfig(RegistryError),

    /// The balance does not cover the commit fee.
    #[error("insufficient credit: balance {balance}, required {required}")]
    InsufficientCredit { balance: i64, required: u64 },

    /// The ledger debit failed; the merge was not published.
    #[error("ledger unavailable: {0}")]
    LedgerUnavailable(LedgerError),

    /// Another commit is outstanding for this session.
    #[error("a commit is already in progress")]
    CommitInProgress,

    /// There are no pending edits to commit.
    #[error("nothing staged")]
    NothingStaged,

    /// The ticket does not belong to the outstanding commit.
    #[error("commit ticket {0} is not the outstanding commit")]
    StaleTicket(u64),
}

impl From<RegistryError> for StagerError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownType(key) => Self::UnknownType(key),
            other => Self::InvalidConfig(other),
        }
    }
}

impl From<MergeError> for StagerError {
    fn from(err: MergeError) -> Self {
        match err {
            MergeError::InvalidConfig(inner) => Self::InvalidConfig(inner),
        }
    }
}

/// Convenience alias for stager results.
pub type StagerResult<T> = Result<T, StagerError>;
