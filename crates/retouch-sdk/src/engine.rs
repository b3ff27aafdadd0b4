use std::sync::Arc;

use tracing::info;

use retouch_descriptor::DeliveryConfig;
use retouch_ledger::CreditLedger;
use retouch_registry::TransformationTypeRegistry;
use retouch_types::ImageId;

use crate::auth::AuthResolver;
use crate::config::EngineConfig;
use crate::error::SdkResult;
use crate::repository::{ImageRepository, RepositoryError, StoredImage};
use crate::session::ImageEditSession;

/// The external services a session talks to.
#[derive(Clone)]
pub struct Ports {
    pub auth: Arc<dyn AuthResolver>,
    pub ledger: Arc<dyn CreditLedger>,
    pub images: Arc<dyn ImageRepository>,
}

impl Ports {
    pub fn new(
        auth: Arc<dyn AuthResolver>,
        ledger: Arc<dyn CreditLedger>,
        images: Arc<dyn ImageRepository>,
    ) -> Self {
        Self {
            auth,
            ledger,
            images,
        }
    }
}

/// Entry point: owns the configuration, the shared registry, and the ports,
/// and opens editing sessions.
pub struct Engine {
    config: EngineConfig,
    registry: Arc<TransformationTypeRegistry>,
    ports: Ports,
}

impl Engine {
    pub fn new(config: EngineConfig, ports: Ports) -> SdkResult<Self> {
        config.validate()?;
        let registry = Arc::new(config.registry()?);
        info!(
            debounce_ms = config.debounce_window_ms,
            default_fee = config.default_fee,
            cloud = %config.delivery.cloud_name,
            "engine ready"
        );
        Ok(Self {
            config,
            registry,
            ports,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &TransformationTypeRegistry {
        &self.registry
    }

    pub fn delivery(&self) -> &DeliveryConfig {
        &self.config.delivery
    }

    /// Open a session that will create a new image.
    pub fn new_session(&self, type_key: &str) -> SdkResult<ImageEditSession> {
        let ty = self.registry.resolve(type_key)?;
        Ok(self.configure(ImageEditSession::new(
            ty,
            self.registry.clone(),
            self.config.delivery.clone(),
            self.ports.clone(),
        )))
    }

    /// Open a session on a persisted image. Only its author may edit it.
    pub async fn edit_session(&self, id: ImageId) -> SdkResult<ImageEditSession> {
        let user = self.ports.auth.resolve().await?;
        let stored = self.ports.images.get_image(id).await?;
        if stored.author != user {
            return Err(RepositoryError::NotAuthor { image: id, user }.into());
        }
        Ok(self.configure(ImageEditSession::resume(
            stored,
            self.registry.clone(),
            self.config.delivery.clone(),
            self.ports.clone(),
        )))
    }

    /// Delete a persisted image. Only its author may delete it.
    pub async fn delete_image(&self, id: ImageId) -> SdkResult<StoredImage> {
        let user = self.ports.auth.resolve().await?;
        let removed = self.ports.images.delete_image(&user, id).await?;
        info!(image = %id, user = %user, "image deleted");
        Ok(removed)
    }

    fn configure(&self, session: ImageEditSession) -> ImageEditSession {
        let window = self.config.debounce_window();
        session.with_stager(|stager| stager.with_debounce_window(window))
    }
}
