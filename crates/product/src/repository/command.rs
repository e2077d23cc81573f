use crate::{
    abstract_trait::product::repository::ProductCommandRepositoryTrait,
    domain::requests::{CreateProductRequest, UpdateProductRequest},
    model::{Product as ProductModel, ProductStatus},
    repository::PRODUCT_COLUMNS,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(
        &self,
        product: &CreateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;
        let fields = &product.fields;

        let sql = format!(
            r#"
            INSERT INTO products
                (brand_id, type_id, material_id, name, default_pic, description, closing_date,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, current_timestamp, current_timestamp)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let result = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(product.brand_id)
            .bind(fields.type_id)
            .bind(fields.material_id)
            .bind(&fields.name)
            .bind(&fields.default_pic)
            .bind(&fields.description)
            .bind(fields.closing_date)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to create product {}: {:?}", fields.name, err);
                RepositoryError::from(err)
            })?;

        info!("✅ Created product ID {} ({})", result.id, result.name);
        Ok(result)
    }

    async fn update_product(
        &self,
        product: &UpdateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;
        let fields = &product.fields;

        let sql = format!(
            r#"
            UPDATE products
            SET type_id = $2,
                material_id = $3,
                name = $4,
                default_pic = $5,
                description = $6,
                closing_date = $7,
                updated_at = current_timestamp
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let result = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(product.id)
            .bind(fields.type_id)
            .bind(fields.material_id)
            .bind(&fields.name)
            .bind(&fields.default_pic)
            .bind(&fields.description)
            .bind(fields.closing_date)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to update product ID {}: {:?}", product.id, err);
                RepositoryError::from(err)
            })?
            .ok_or(RepositoryError::NotFound)?;

        info!("🔄 Updated product ID {}", result.id);
        Ok(result)
    }

    async fn update_status(
        &self,
        id: i32,
        from: ProductStatus,
        to: ProductStatus,
    ) -> Result<ProductModel, RepositoryError> {
        info!("🔄 Moving product {} from {} to {}", id, from, to);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
            UPDATE products
            SET status = $3,
                updated_at = current_timestamp
            WHERE id = $1 AND status = $2
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let product = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to update status of product {}: {:?}", id, e);
                RepositoryError::from(e)
            })?
            .ok_or(RepositoryError::NotFound)?;

        info!("✅ Product ID {} is now {}", product.id, product.status);
        Ok(product)
    }

    async fn delete_product(&self, id: i32) -> Result<ProductModel, RepositoryError> {
        info!("❌ Deleting product: {}", id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("DELETE FROM products WHERE id = $1 RETURNING {PRODUCT_COLUMNS}");

        let product = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete product {}: {:?}", id, e);
                RepositoryError::from(e)
            })?
            .ok_or(RepositoryError::NotFound)?;

        info!("✅ Product ID {} permanently deleted", id);
        Ok(product)
    }
}
