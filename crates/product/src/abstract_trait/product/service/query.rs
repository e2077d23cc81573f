use crate::domain::{
    requests::ProductFilter,
    response::{api::ApiResponse, product::ProductResponse},
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynProductQueryService = Arc<dyn ProductQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryServiceTrait {
    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn find_by_brand(
        &self,
        brand_id: i32,
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError>;
    async fn find_by_type(
        &self,
        type_id: i32,
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError>;
    async fn find_by_material(
        &self,
        material_id: i32,
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError>;
    async fn find_filtered(
        &self,
        filter: &ProductFilter,
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError>;
}
