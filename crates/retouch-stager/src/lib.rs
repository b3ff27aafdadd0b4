//! Staging engine for Retouch.
//!
//! Accumulates a user's in-progress edits in a pending delta, coalesces
//! rapid edits to the same field through a keyed debouncer, and folds the
//! delta into the committed configuration only when a commit passes the
//! credit gate and the ledger debit succeeds.

pub mod debounce;
pub mod error;
pub mod stager;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE_WINDOW};
pub use error::{StagerError, StagerResult};
pub use stager::{CommitReceipt, CommitTicket, ConfigStager, FieldKey, PendingUpdate};
