//! Credit ledger boundary for Retouch.
//!
//! The ledger owns every user's credit balance. The staging engine only
//! reads a balance immediately before gating a commit and debits it once
//! the merge has been computed. This crate provides:
//! - The [`CreditLedger`] trait boundary
//! - [`InMemoryCreditLedger`] for tests and embedding
//! - [`LedgerEntry`] records of every balance movement

pub mod error;
pub mod memory;
pub mod traits;

pub use error::LedgerError;
pub use memory::{EntryKind, InMemoryCreditLedger, LedgerEntry, DEFAULT_STARTING_BALANCE};
pub use traits::CreditLedger;
