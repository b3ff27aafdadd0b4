//! Transformation type registry for Retouch.
//!
//! A static lookup table from each transformation type to its declared
//! parameter shape, default parameters, UI field set, and credit fee. The
//! registry holds no mutable state and is shared read-only between
//! sessions.
//!
//! # Key Types
//!
//! - [`TransformationTypeRegistry`] -- The lookup table
//! - [`TypeSpec`] -- Everything known about one transformation type
//! - [`FieldSpec`] / [`FieldKind`] -- Declared parameter fields
//! - [`RegistryError`] -- Unknown types and shape violations

pub mod error;
pub mod registry;
pub mod shape;

pub use error::{RegistryError, RegistryResult};
pub use registry::{TransformationTypeRegistry, DEFAULT_FEE};
pub use shape::{FieldKind, FieldSpec, TypeSpec};
