//! Merge engine for Retouch.
//!
//! Folds a staged delta into a committed configuration. The merge is
//! right-biased (the delta always wins on conflict), recurses into nested
//! objects, replaces arrays and primitives wholesale, and never mutates
//! its inputs.

pub mod engine;
pub mod error;

pub use engine::{merge, merge_params, merge_value, MergeEngine};
pub use error::MergeError;
