use crate::{
    abstract_trait::product::repository::ProductQueryRepositoryTrait,
    domain::requests::ProductFilter, model::Product as ProductModel,
    repository::PRODUCT_COLUMNS,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    async fn find_by_column(
        &self,
        column: &'static str,
        value: i32,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE {column} = $1 ORDER BY id");

        sqlx::query_as::<_, ProductModel>(&sql)
            .bind(value)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch products by {column} {value}: {:?}", e);
                RepositoryError::from(e)
            })
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError> {
        info!("🆔 Fetching product by ID: {}", id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");

        let result = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(RepositoryError::from)?;

        Ok(result)
    }

    async fn find_by_brand(&self, brand_id: i32) -> Result<Vec<ProductModel>, RepositoryError> {
        info!("🏷️ Fetching products for brand {}", brand_id);
        self.find_by_column("brand_id", brand_id).await
    }

    async fn find_by_type(&self, type_id: i32) -> Result<Vec<ProductModel>, RepositoryError> {
        info!("🗂️ Fetching products for type {}", type_id);
        self.find_by_column("type_id", type_id).await
    }

    async fn find_by_material(
        &self,
        material_id: i32,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        info!("🧵 Fetching products for material {}", material_id);
        self.find_by_column("material_id", material_id).await
    }

    async fn find_filtered(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        info!("🔍 Fetching products with filter: {:?}", filter);

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        // NULL binds leave the matching predicate out of the conjunction
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1::INT IS NULL OR brand_id = $1)
              AND ($2::INT IS NULL OR type_id = $2)
              AND ($3::INT IS NULL OR material_id = $3)
            ORDER BY id
            "#
        );

        let products = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(filter.brand.as_bind())
            .bind(filter.kind.as_bind())
            .bind(filter.material.as_bind())
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch filtered products: {:?}", e);
                RepositoryError::from(e)
            })?;

        info!("✅ Found {} products for filter", products.len());
        Ok(products)
    }
}
