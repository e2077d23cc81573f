use crate::domain::requests::ImageUpload;
use async_trait::async_trait;
use mockall::automock;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynImageStorage = Arc<dyn ImageStorageTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait ImageStorageTrait {
    /// Persists the upload and returns the public path it is served from.
    async fn save(&self, upload: ImageUpload) -> Result<String, ServiceError>;
    /// Deletes a picture previously returned by `save`. Missing files are fine.
    async fn remove(&self, public_path: &str) -> Result<(), ServiceError>;
}
