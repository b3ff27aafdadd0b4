/// Errors that can occur during gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// The balance does not cover the fee.
    #[error("insufficient credit: balance {balance}, required {required}")]
    InsufficientCredit { balance: i64, required: u64 },
}
