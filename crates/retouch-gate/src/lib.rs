//! Credit gate for Retouch.
//!
//! Every commit of a staged transformation must pass through the gate
//! before the ledger is debited. The gate is a pure decision: it holds no
//! balance and must be handed a freshly read balance on every attempt.
//!
//! # Quick Start
//!
//! ```rust
//! use retouch_gate::{CreditGate, GateDecision};
//!
//! let gate = CreditGate::new();
//! assert_eq!(gate.check(100, 10), GateDecision::Allowed { remaining: 90 });
//! assert!(gate.check(5, 10).is_insufficient());
//! ```

pub mod error;
pub mod gate;

pub use error::GateError;
pub use gate::{CreditGate, GateDecision};
