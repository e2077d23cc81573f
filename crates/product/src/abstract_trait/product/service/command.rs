use crate::domain::{
    requests::{ImageUpload, ProductForm},
    response::{api::ApiResponse, product::ProductResponse},
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynProductCommandService = Arc<dyn ProductCommandServiceTrait + Send + Sync>;

/// Create and full update take the raw form so that required fields are
/// checked before any uploaded image is written.
#[async_trait]
pub trait ProductCommandServiceTrait {
    async fn create_product(
        &self,
        brand_id: i32,
        form: ProductForm,
        image: Option<ImageUpload>,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn update_product(
        &self,
        id: i32,
        form: ProductForm,
        image: Option<ImageUpload>,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn update_status(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn delete_product(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError>;
}
