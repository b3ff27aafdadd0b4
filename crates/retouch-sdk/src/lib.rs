//! High-level SDK for Retouch.
//!
//! The main entry point for applications embedding the staging engine:
//! [`Engine`] opens [`ImageEditSession`]s, each of which stages edits,
//! applies them behind the credit gate, and persists the result through the
//! [`ImageRepository`] port. [`DebouncedSession`] drives a session's
//! debouncer on the tokio clock.

pub mod auth;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod repository;
pub mod session;

pub use auth::{Anonymous, AuthError, AuthResolver, StaticAuth};
pub use config::{ConfigError, EngineConfig};
pub use driver::DebouncedSession;
pub use engine::{Engine, Ports};
pub use error::{SdkError, SdkResult};
pub use repository::{
    ImageRecord, ImageRepository, InMemoryImageRepository, RepositoryError, StoredImage,
};
pub use session::{ApplyTicket, EditMode, ImageEditSession};

// Re-export key types
pub use retouch_descriptor::{DeliveryConfig, RequestDescriptor};
pub use retouch_ledger::{CreditLedger, InMemoryCreditLedger, LedgerError};
pub use retouch_stager::{CommitReceipt, PendingUpdate, StagerError};
pub use retouch_types::{
    AspectRatio, ImageAttributes, ImageId, TransformationConfig, TransformationType, UserId,
};
