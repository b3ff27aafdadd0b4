use async_trait::async_trait;
use retouch_types::UserId;

use crate::error::LedgerError;

/// Boundary to the authoritative store of credit balances.
///
/// Implementations are remote in production, so every call may fail with
/// [`LedgerError::Unavailable`]. Debits are not guarded against going
/// negative here; that is the gate's job, and out-of-band debits are
/// outside the engine's control.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Current balance of `user`.
    async fn get_balance(&self, user: &UserId) -> Result<i64, LedgerError>;

    /// Subtract `amount` from the balance of `user`, returning the new balance.
    async fn debit(&self, user: &UserId, amount: u64) -> Result<i64, LedgerError>;

    /// Add `amount` to the balance of `user` (credit purchases), returning
    /// the new balance.
    async fn credit(&self, user: &UserId, amount: u64) -> Result<i64, LedgerError>;
}
