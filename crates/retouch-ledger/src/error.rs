use retouch_types::UserId;

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("no credit account for user {0}")]
    AccountNotFound(UserId),

    #[error("credit account already exists for user {0}")]
    AccountExists(UserId),

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}
