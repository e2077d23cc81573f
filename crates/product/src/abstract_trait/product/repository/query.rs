use crate::{domain::requests::ProductFilter, model::Product as ProductModel};
use async_trait::async_trait;
use mockall::automock;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait ProductQueryRepositoryTrait {
    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError>;
    async fn find_by_brand(&self, brand_id: i32) -> Result<Vec<ProductModel>, RepositoryError>;
    async fn find_by_type(&self, type_id: i32) -> Result<Vec<ProductModel>, RepositoryError>;
    async fn find_by_material(
        &self,
        material_id: i32,
    ) -> Result<Vec<ProductModel>, RepositoryError>;
    /// One statement for every combination of set and unset criteria.
    async fn find_filtered(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductModel>, RepositoryError>;
}
