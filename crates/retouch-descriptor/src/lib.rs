//! Request descriptors for Retouch.
//!
//! Turns an image's attributes and its committed transformation
//! configuration into the deterministic descriptor the rendering service
//! consumes, renders it as a delivery URL, and fingerprints it with
//! domain-separated BLAKE3 so callers can tell when it changed.

pub mod descriptor;
pub mod error;
pub mod hasher;
pub mod url;

pub use descriptor::{derive, RequestDescriptor, ASPECT_RATIO_FIELD};
pub use error::{DescriptorError, DescriptorResult};
pub use hasher::Fingerprinter;
pub use url::DeliveryConfig;
