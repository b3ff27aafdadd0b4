use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use retouch_descriptor::RequestDescriptor;
use retouch_types::{ImageAttributes, ImageId, TransformationConfig, TransformationType, UserId};

/// What the engine hands to persistence after a commit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub title: String,
    pub transformation_type: TransformationType,
    pub attributes: ImageAttributes,
    pub config: TransformationConfig,
    pub descriptor: RequestDescriptor,
    pub transformation_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A persisted image with the identity and timestamps the repository owns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub id: ImageId,
    pub author: UserId,
    pub record: ImageRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("image not found: {0}")]
    ImageNotFound(ImageId),

    #[error("user {user} is not the author of image {image}")]
    NotAuthor { image: ImageId, user: UserId },

    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for edited images.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Store a new image owned by `author`.
    async fn add_image(&self, author: &UserId, record: ImageRecord)
        -> Result<StoredImage, RepositoryError>;

    /// Replace the record of an existing image. Only its author may do so.
    async fn update_image(
        &self,
        author: &UserId,
        id: ImageId,
        record: ImageRecord,
    ) -> Result<StoredImage, RepositoryError>;

    /// Remove an image and return its last state. Only its author may do so.
    async fn delete_image(&self, author: &UserId, id: ImageId)
        -> Result<StoredImage, RepositoryError>;

    async fn get_image(&self, id: ImageId) -> Result<StoredImage, RepositoryError>;
}

/// In-memory image repository.
#[derive(Default)]
pub struct InMemoryImageRepository {
    images: RwLock<HashMap<ImageId, StoredImage>>,
}

impl InMemoryImageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.images.read().map(|images| images.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> RepositoryError {
        RepositoryError::Unavailable("image store lock poisoned".into())
    }
}

#[async_trait]
impl ImageRepository for InMemoryImageRepository {
    async fn add_image(
        &self,
        author: &UserId,
        record: ImageRecord,
    ) -> Result<StoredImage, RepositoryError> {
        let now = Utc::now();
        let stored = StoredImage {
            id: ImageId::new(),
            author: author.clone(),
            record,
            created_at: now,
            updated_at: now,
        };
        self.images
            .write()
            .map_err(|_| Self::poisoned())?
            .insert(stored.id, stored.clone());
        info!(image = %stored.id, author = %author, "image added");
        Ok(stored)
    }

    async fn update_image(
        &self,
        author: &UserId,
        id: ImageId,
        record: ImageRecord,
    ) -> Result<StoredImage, RepositoryError> {
        let mut images = self.images.write().map_err(|_| Self::poisoned())?;
        let stored = images.get_mut(&id).ok_or(RepositoryError::ImageNotFound(id))?;
        if &stored.author != author {
            return Err(RepositoryError::NotAuthor {
                image: id,
                user: author.clone(),
            });
        }
        stored.record = record;
        stored.updated_at = Utc::now();
        info!(image = %id, author = %author, "image updated");
        Ok(stored.clone())
    }

    async fn delete_image(
        &self,
        author: &UserId,
        id: ImageId,
    ) -> Result<StoredImage, RepositoryError> {
        let mut images = self.images.write().map_err(|_| Self::poisoned())?;
        let stored = images.get(&id).ok_or(RepositoryError::ImageNotFound(id))?;
        if &stored.author != author {
            return Err(RepositoryError::NotAuthor {
                image: id,
                user: author.clone(),
            });
        }
        let removed = images.remove(&id).ok_or(RepositoryError::ImageNotFound(id))?;
        info!(image = %id, author = %author, "image deleted");
        Ok(removed)
    }

    async fn get_image(&self, id: ImageId) -> Result<StoredImage, RepositoryError> {
        self.images
            .read()
            .map_err(|_| Self::poisoned())?
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::ImageNotFound(id))
    }
}
