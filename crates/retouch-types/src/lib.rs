//! Foundation types for Retouch.
//!
//! This crate provides the data model shared by every other Retouch crate:
//! the closed set of transformation types, the configuration maps that the
//! staging engine merges, and the image attributes the descriptor is
//! derived from.
//!
//! # Key Types
//!
//! - [`TransformationType`]: One of the fixed image-edit operations
//! - [`TransformationConfig`]: Per-type parameter objects (committed or pending)
//! - [`ImageAttributes`]: Source identifier and target dimensions of an image
//! - [`AspectRatio`]: The selectable aspect-ratio presets
//! - [`UserId`] / [`ImageId`]: Identities of the acting user and persisted images

pub mod config;
pub mod error;
pub mod identity;
pub mod image;
pub mod transformation;

pub use config::{ParamObject, TransformationConfig};
pub use error::TypeError;
pub use identity::{ImageId, UserId};
pub use image::{AspectRatio, ImageAttributes};
pub use transformation::TransformationType;

/// Re-exported so downstream crates name parameter values consistently.
pub use serde_json::Value;
