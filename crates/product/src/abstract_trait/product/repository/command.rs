use crate::{
    domain::requests::{CreateProductRequest, UpdateProductRequest},
    model::{Product as ProductModel, ProductStatus},
};
use async_trait::async_trait;
use mockall::automock;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductCommandRepository = Arc<dyn ProductCommandRepositoryTrait + Send + Sync>;

/// Writes return the affected row, or `RepositoryError::NotFound` when the
/// id does not exist.
#[automock]
#[async_trait]
pub trait ProductCommandRepositoryTrait {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ProductModel, RepositoryError>;
    async fn update_product(
        &self,
        req: &UpdateProductRequest,
    ) -> Result<ProductModel, RepositoryError>;
    /// Compare-and-set: only a row still in `from` moves to `to`, anything
    /// else yields `NotFound`.
    async fn update_status(
        &self,
        id: i32,
        from: ProductStatus,
        to: ProductStatus,
    ) -> Result<ProductModel, RepositoryError>;
    async fn delete_product(&self, id: i32) -> Result<ProductModel, RepositoryError>;
}
