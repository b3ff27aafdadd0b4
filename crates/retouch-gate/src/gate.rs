use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GateError;

// ---------------------------------------------------------------------------
// GateDecision
// ---------------------------------------------------------------------------

/// The outcome of checking a balance against a fee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateDecision {
    /// The commit may proceed; `remaining` is the balance after the debit.
    Allowed { remaining: i64 },
    /// The balance does not cover the fee.
    InsufficientCredit { balance: i64, required: u64 },
}

impl GateDecision {
    /// Returns `true` if the commit may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns `true` if the balance was too low.
    pub fn is_insufficient(&self) -> bool {
        matches!(self, Self::InsufficientCredit { .. })
    }

    /// Convert into a result carrying the post-commit balance.
    pub fn into_result(self) -> Result<i64, GateError> {
        match self {
            Self::Allowed { remaining } => Ok(remaining),
            Self::InsufficientCredit { balance, required } => {
                Err(GateError::InsufficientCredit { balance, required })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CreditGate
// ---------------------------------------------------------------------------

/// Stateless balance gate.
///
/// Fees are compared by magnitude, so a fee expressed as a signed ledger
/// delta (`-1`) and one expressed as a cost (`1`) gate identically.
#[derive(Clone, Copy, Debug, Default)]
pub struct CreditGate;

impl CreditGate {
    pub fn new() -> Self {
        Self
    }

    /// Decide whether `balance` covers `fee`.
    ///
    /// Insufficient iff `balance < |fee|`; a balance exactly equal to the
    /// fee is allowed and leaves zero.
    pub fn check(&self, balance: i64, fee: i64) -> GateDecision {
        let required = fee.unsigned_abs();
        let decision = if i128::from(balance) < i128::from(required) {
            GateDecision::InsufficientCredit { balance, required }
        } else {
            GateDecision::Allowed {
                remaining: self.post_commit_balance(balance, fee),
            }
        };
        debug!(balance, fee, allowed = decision.is_allowed(), "credit gate evaluated");
        decision
    }

    /// Whether `balance` covers `fee`.
    pub fn can_afford(&self, balance: i64, fee: i64) -> bool {
        i128::from(balance) >= i128::from(fee.unsigned_abs())
    }

    /// Balance left after debiting `|fee|`, saturating at the `i64` range.
    pub fn post_commit_balance(&self, balance: i64, fee: i64) -> i64 {
        let remaining = i128::from(balance) - i128::from(fee.unsigned_abs());
        remaining.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }
}
