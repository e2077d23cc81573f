use crate::{
    abstract_trait::{
        product::{
            repository::{DynProductCommandRepository, DynProductQueryRepository},
            service::ProductCommandServiceTrait,
        },
        storage::DynImageStorage,
    },
    domain::{
        requests::{CreateProductRequest, ImageUpload, ProductForm, UpdateProductRequest},
        response::{api::ApiResponse, product::ProductResponse},
    },
    model::Product as ProductModel,
};
use async_trait::async_trait;
use shared::{
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, Status},
};
use tokio::time::Instant;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct ProductCommandService {
    pub query: DynProductQueryRepository,
    pub command: DynProductCommandRepository,
    pub storage: DynImageStorage,
    pub metrics: Metrics,
}

impl ProductCommandService {
    pub fn new(
        query: DynProductQueryRepository,
        command: DynProductCommandRepository,
        storage: DynImageStorage,
        metrics: Metrics,
    ) -> Self {
        Self {
            query,
            command,
            storage,
            metrics,
        }
    }

    fn complete<T>(
        &self,
        operation: &str,
        method: Method,
        started: Instant,
        result: &Result<T, ServiceError>,
    ) {
        let elapsed = started.elapsed().as_secs_f64();

        let status = match result {
            Ok(_) => {
                info!("✅ Operation completed successfully: {operation}");
                Status::Success
            }
            Err(e) => {
                error!("❌ Operation {operation} failed: {e:?}");
                Status::Error
            }
        };

        self.metrics.record(operation, method, status, elapsed);
    }

    /// Stores the picture, if any, only once the rest of the form is valid.
    async fn store_image(&self, image: Option<ImageUpload>) -> Result<Option<String>, ServiceError> {
        match image {
            Some(upload) if upload.is_image() => self.storage.save(upload).await.map(Some),
            Some(upload) => {
                warn!(
                    "⚠️ Ignoring upload '{}' with non-image content type {}",
                    upload.file_name, upload.content_type
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Removal failures are logged, never surfaced.
    async fn discard_image(&self, path: Option<String>) {
        let Some(path) = path else {
            return;
        };

        match self.storage.remove(&path).await {
            Ok(()) => info!("🧹 Removed orphaned picture {path}"),
            Err(e) => warn!("⚠️ Could not remove orphaned picture {path}: {e:?}"),
        }
    }

    async fn create(
        &self,
        brand_id: i32,
        form: ProductForm,
        image: Option<ImageUpload>,
    ) -> Result<ProductModel, ServiceError> {
        // brand "0" is the unset sentinel, a product always belongs to a brand
        if brand_id == 0 {
            return Err(ServiceError::MissingFields(vec!["brand_id"]));
        }

        let mut fields = form.into_fields()?;

        // a new product never inherits a picture path from the form body
        let stored = self.store_image(image).await?;
        fields.default_pic = stored.clone();

        let req = CreateProductRequest { brand_id, fields };

        match self.command.create_product(&req).await {
            Ok(product) => Ok(product),
            Err(e) => {
                self.discard_image(stored).await;
                Err(e.into())
            }
        }
    }

    async fn update(
        &self,
        id: i32,
        form: ProductForm,
        image: Option<ImageUpload>,
    ) -> Result<ProductModel, ServiceError> {
        let mut fields = form.into_fields()?;

        let stored = self.store_image(image).await?;
        if let Some(path) = &stored {
            fields.default_pic = Some(path.clone());
        }

        let req = UpdateProductRequest { id, fields };

        match self.command.update_product(&req).await {
            Ok(product) => Ok(product),
            Err(e) => {
                self.discard_image(stored).await;
                Err(e.into())
            }
        }
    }

    async fn advance_status(&self, id: i32) -> Result<ProductModel, ServiceError> {
        let current = self
            .query
            .find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let next = current.status.next().ok_or_else(|| {
            ServiceError::InvalidTransition(format!(
                "product {id} is {} and cannot advance further",
                current.status
            ))
        })?;

        match self.command.update_status(id, current.status, next).await {
            Ok(product) => Ok(product),
            Err(RepositoryError::NotFound) => {
                // lost the race: either deleted or moved on by another request
                let latest = self
                    .query
                    .find_by_id(id)
                    .await?
                    .ok_or(RepositoryError::NotFound)?;

                Err(ServiceError::InvalidTransition(format!(
                    "product {id} moved from {} to {} before this update",
                    current.status, latest.status
                )))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn create_product(
        &self,
        brand_id: i32,
        form: ProductForm,
        image: Option<ImageUpload>,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🏗️ Creating product for brand {brand_id}");
        let started = Instant::now();

        let result = self.create(brand_id, form, image).await;
        self.complete("create_product", Method::Post, started, &result);

        Ok(ApiResponse::new(
            "Success added new product",
            ProductResponse::from(result?),
        ))
    }

    async fn update_product(
        &self,
        id: i32,
        form: ProductForm,
        image: Option<ImageUpload>,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🔄 Updating product {id}");
        let started = Instant::now();

        let result = self.update(id, form, image).await;
        self.complete("update_product", Method::Put, started, &result);

        Ok(ApiResponse::new(
            format!("Success updated product with id {id}"),
            ProductResponse::from(result?),
        ))
    }

    async fn update_status(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🔄 Advancing status of product {id}");
        let started = Instant::now();

        let result = self.advance_status(id).await;
        self.complete("update_status", Method::Patch, started, &result);

        Ok(ApiResponse::new(
            format!("Success updated product with id {id}"),
            ProductResponse::from(result?),
        ))
    }

    async fn delete_product(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🗑️ Deleting product {id}");
        let started = Instant::now();

        let result = self
            .command
            .delete_product(id)
            .await
            .map_err(ServiceError::from);
        self.complete("delete_product", Method::Delete, started, &result);

        Ok(ApiResponse::new(
            format!("Success deleted product with id {id}"),
            ProductResponse::from(result?),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::{
            product::repository::{
                MockProductCommandRepositoryTrait, MockProductQueryRepositoryTrait,
            },
            storage::MockImageStorageTrait,
        },
        model::ProductStatus,
    };
    use chrono::NaiveDate;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use testresult::TestResult;

    fn stored(id: i32, req: &CreateProductRequest) -> ProductModel {
        ProductModel {
            id,
            brand_id: req.brand_id,
            type_id: req.fields.type_id,
            material_id: req.fields.material_id,
            name: req.fields.name.clone(),
            default_pic: req.fields.default_pic.clone(),
            description: req.fields.description.clone(),
            closing_date: req.fields.closing_date,
            status: ProductStatus::Draft,
            created_at: None,
            updated_at: None,
        }
    }

    fn with_status(id: i32, status: ProductStatus) -> ProductModel {
        ProductModel {
            id,
            brand_id: 2,
            type_id: 1,
            material_id: None,
            name: "Shirt".into(),
            default_pic: None,
            description: "desc".into(),
            closing_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            status,
            created_at: None,
            updated_at: None,
        }
    }

    fn shirt_form() -> ProductForm {
        ProductForm {
            type_id: Some("1".into()),
            name: Some("Shirt".into()),
            description: Some("desc".into()),
            closing_date: Some("2024-01-01".into()),
            ..ProductForm::default()
        }
    }

    fn png() -> ImageUpload {
        ImageUpload {
            file_name: "shirt.png".into(),
            content_type: "image/png".into(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    fn service(
        query: MockProductQueryRepositoryTrait,
        command: MockProductCommandRepositoryTrait,
        storage: MockImageStorageTrait,
    ) -> ProductCommandService {
        ProductCommandService::new(
            Arc::new(query),
            Arc::new(command),
            Arc::new(storage),
            Metrics::new(),
        )
    }

    #[tokio::test]
    async fn create_without_image_has_no_picture() -> TestResult {
        let mut command = MockProductCommandRepositoryTrait::new();
        let mut storage = MockImageStorageTrait::new();

        storage.expect_save().never();
        command
            .expect_create_product()
            .once()
            .withf(|req| req.brand_id == 2 && req.fields.default_pic.is_none())
            .returning(|req| Ok(stored(1, req)));

        let svc = service(MockProductQueryRepositoryTrait::new(), command, storage);
        let response = svc.create_product(2, shirt_form(), None).await?;

        assert_eq!(response.message, "Success added new product");
        assert_eq!(response.payload.brand_id, 2);
        assert_eq!(response.payload.type_id, 1);
        assert_eq!(response.payload.default_pic, None);

        Ok(())
    }

    #[tokio::test]
    async fn create_stores_image_and_keeps_path() -> TestResult {
        let mut command = MockProductCommandRepositoryTrait::new();
        let mut storage = MockImageStorageTrait::new();

        storage
            .expect_save()
            .once()
            .withf(|upload| upload.file_name == "shirt.png")
            .return_once(|_| Ok("/images/products/1-shirt.png".into()));
        command
            .expect_create_product()
            .once()
            .returning(|req| Ok(stored(7, req)));

        let svc = service(MockProductQueryRepositoryTrait::new(), command, storage);
        let response = svc.create_product(2, shirt_form(), Some(png())).await?;

        assert_eq!(
            response.payload.default_pic.as_deref(),
            Some("/images/products/1-shirt.png")
        );

        Ok(())
    }

    #[tokio::test]
    async fn non_image_upload_is_silently_dropped() -> TestResult {
        let mut command = MockProductCommandRepositoryTrait::new();
        let mut storage = MockImageStorageTrait::new();

        storage.expect_save().never();
        command
            .expect_create_product()
            .once()
            .returning(|req| Ok(stored(3, req)));

        let pdf = ImageUpload {
            content_type: "application/pdf".into(),
            ..png()
        };

        let svc = service(MockProductQueryRepositoryTrait::new(), command, storage);
        let response = svc.create_product(2, shirt_form(), Some(pdf)).await?;

        assert_eq!(response.payload.default_pic, None);

        Ok(())
    }

    #[tokio::test]
    async fn missing_fields_skip_storage_and_store() {
        let mut command = MockProductCommandRepositoryTrait::new();
        let mut storage = MockImageStorageTrait::new();

        storage.expect_save().never();
        command.expect_create_product().never();

        let form = ProductForm {
            name: None,
            ..shirt_form()
        };

        let svc = service(MockProductQueryRepositoryTrait::new(), command, storage);
        let result = svc.create_product(2, form, Some(png())).await;

        assert!(matches!(result, Err(ServiceError::MissingFields(ref f)) if f == &["name"]));
    }

    #[tokio::test]
    async fn unset_brand_is_missing_information() {
        let mut command = MockProductCommandRepositoryTrait::new();
        let mut storage = MockImageStorageTrait::new();

        storage.expect_save().never();
        command.expect_create_product().never();

        let svc = service(MockProductQueryRepositoryTrait::new(), command, storage);
        let result = svc.create_product(0, shirt_form(), Some(png())).await;

        assert!(matches!(result, Err(ServiceError::MissingFields(ref f)) if f == &["brand_id"]));
    }

    #[tokio::test]
    async fn rejected_create_removes_stored_picture() {
        let mut command = MockProductCommandRepositoryTrait::new();
        let mut storage = MockImageStorageTrait::new();

        storage
            .expect_save()
            .once()
            .return_once(|_| Ok("/images/products/1-shirt.png".into()));
        storage
            .expect_remove()
            .once()
            .withf(|path| path == "/images/products/1-shirt.png")
            .return_once(|_| Ok(()));
        command
            .expect_create_product()
            .once()
            .return_once(|_| Err(RepositoryError::ForeignKey("products_type_id_fkey".into())));

        let svc = service(MockProductQueryRepositoryTrait::new(), command, storage);
        let result = svc.create_product(2, shirt_form(), Some(png())).await;

        assert!(matches!(
            result,
            Err(ServiceError::Repo(RepositoryError::ForeignKey(_)))
        ));
    }

    #[tokio::test]
    async fn rejected_update_removes_only_the_new_picture() {
        let mut command = MockProductCommandRepositoryTrait::new();
        let mut storage = MockImageStorageTrait::new();

        storage
            .expect_save()
            .once()
            .return_once(|_| Ok("/images/products/2-new.png".into()));
        storage
            .expect_remove()
            .once()
            .withf(|path| path == "/images/products/2-new.png")
            .return_once(|_| Ok(()));
        command
            .expect_update_product()
            .once()
            .return_once(|_| Err(RepositoryError::NotFound));

        let form = ProductForm {
            default_pic: Some("/images/products/old.png".into()),
            ..shirt_form()
        };

        let svc = service(MockProductQueryRepositoryTrait::new(), command, storage);
        let result = svc.update_product(99, form, Some(png())).await;

        assert!(matches!(
            result,
            Err(ServiceError::Repo(RepositoryError::NotFound))
        ));
    }

    #[tokio::test]
    async fn failed_cleanup_keeps_the_original_error() {
        let mut command = MockProductCommandRepositoryTrait::new();
        let mut storage = MockImageStorageTrait::new();

        storage
            .expect_save()
            .once()
            .return_once(|_| Ok("/images/products/1-shirt.png".into()));
        storage
            .expect_remove()
            .once()
            .return_once(|_| Err(ServiceError::Storage("permission denied".into())));
        command
            .expect_create_product()
            .once()
            .return_once(|_| Err(RepositoryError::Custom("connection reset".into())));

        let svc = service(MockProductQueryRepositoryTrait::new(), command, storage);
        let result = svc.create_product(2, shirt_form(), Some(png())).await;

        assert!(matches!(
            result,
            Err(ServiceError::Repo(RepositoryError::Custom(_)))
        ));
    }

    #[tokio::test]
    async fn storage_failure_is_surfaced() {
        let mut command = MockProductCommandRepositoryTrait::new();
        let mut storage = MockImageStorageTrait::new();

        storage
            .expect_save()
            .once()
            .return_once(|_| Err(ServiceError::Storage("disk full".into())));
        command.expect_create_product().never();

        let svc = service(MockProductQueryRepositoryTrait::new(), command, storage);
        let result = svc.create_product(2, shirt_form(), Some(png())).await;

        assert!(matches!(result, Err(ServiceError::Storage(_))));
    }

    #[tokio::test]
    async fn update_keeps_submitted_picture_without_upload() -> TestResult {
        let mut command = MockProductCommandRepositoryTrait::new();
        let mut storage = MockImageStorageTrait::new();

        storage.expect_save().never();
        command
            .expect_update_product()
            .once()
            .withf(|req| {
                req.id == 5 && req.fields.default_pic.as_deref() == Some("/images/products/old.png")
            })
            .returning(|req| {
                let mut product = with_status(req.id, ProductStatus::Active);
                product.default_pic = req.fields.default_pic.clone();
                Ok(product)
            });

        let form = ProductForm {
            default_pic: Some("/images/products/old.png".into()),
            ..shirt_form()
        };

        let svc = service(MockProductQueryRepositoryTrait::new(), command, storage);
        let response = svc.update_product(5, form, None).await?;

        assert_eq!(response.message, "Success updated product with id 5");
        assert_eq!(response.payload.id, 5);

        Ok(())
    }

    #[tokio::test]
    async fn update_of_unknown_product_is_not_found() {
        let mut command = MockProductCommandRepositoryTrait::new();
        command
            .expect_update_product()
            .once()
            .return_once(|_| Err(RepositoryError::NotFound));

        let svc = service(
            MockProductQueryRepositoryTrait::new(),
            command,
            MockImageStorageTrait::new(),
        );
        let result = svc.update_product(99, shirt_form(), None).await;

        assert!(matches!(
            result,
            Err(ServiceError::Repo(RepositoryError::NotFound))
        ));
    }

    #[tokio::test]
    async fn status_update_advances_one_step() -> TestResult {
        let mut query = MockProductQueryRepositoryTrait::new();
        let mut command = MockProductCommandRepositoryTrait::new();

        query
            .expect_find_by_id()
            .once()
            .return_once(|id| Ok(Some(with_status(id, ProductStatus::Draft))));
        command
            .expect_update_status()
            .once()
            .withf(|id, from, to| {
                *id == 4 && *from == ProductStatus::Draft && *to == ProductStatus::Active
            })
            .return_once(|id, _, to| Ok(with_status(id, to)));

        let svc = service(query, command, MockImageStorageTrait::new());
        let response = svc.update_status(4).await?;

        assert_eq!(response.payload.status, ProductStatus::Active);

        Ok(())
    }

    #[tokio::test]
    async fn closed_products_cannot_advance() {
        let mut query = MockProductQueryRepositoryTrait::new();
        let mut command = MockProductCommandRepositoryTrait::new();

        query
            .expect_find_by_id()
            .once()
            .return_once(|id| Ok(Some(with_status(id, ProductStatus::Closed))));
        command.expect_update_status().never();

        let svc = service(query, command, MockImageStorageTrait::new());
        let result = svc.update_status(4).await;

        assert!(matches!(result, Err(ServiceError::InvalidTransition(_))));
    }

    /// First read sees `first`, every later read sees `then`.
    fn reads(
        first: Option<ProductStatus>,
        then: Option<ProductStatus>,
    ) -> MockProductQueryRepositoryTrait {
        let calls = AtomicUsize::new(0);
        let mut query = MockProductQueryRepositoryTrait::new();

        query.expect_find_by_id().times(2).returning(move |id| {
            let status = if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                first
            } else {
                then
            };
            Ok(status.map(|s| with_status(id, s)))
        });

        query
    }

    #[tokio::test]
    async fn stale_status_write_is_a_conflict() {
        let mut command = MockProductCommandRepositoryTrait::new();
        command
            .expect_update_status()
            .once()
            .withf(|_, from, to| *from == ProductStatus::Draft && *to == ProductStatus::Active)
            .return_once(|_, _, _| Err(RepositoryError::NotFound));

        let query = reads(Some(ProductStatus::Draft), Some(ProductStatus::Closed));

        let svc = service(query, command, MockImageStorageTrait::new());
        let result = svc.update_status(4).await;

        assert!(matches!(result, Err(ServiceError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn product_deleted_before_status_write_is_not_found() {
        let mut command = MockProductCommandRepositoryTrait::new();
        command
            .expect_update_status()
            .once()
            .return_once(|_, _, _| Err(RepositoryError::NotFound));

        let query = reads(Some(ProductStatus::Active), None);

        let svc = service(query, command, MockImageStorageTrait::new());
        let result = svc.update_status(4).await;

        assert!(matches!(
            result,
            Err(ServiceError::Repo(RepositoryError::NotFound))
        ));
    }

    #[tokio::test]
    async fn status_update_of_unknown_product_is_not_found() {
        let mut query = MockProductQueryRepositoryTrait::new();
        let mut command = MockProductCommandRepositoryTrait::new();

        query.expect_find_by_id().once().return_once(|_| Ok(None));
        command.expect_update_status().never();

        let svc = service(query, command, MockImageStorageTrait::new());
        let result = svc.update_status(4).await;

        assert!(matches!(
            result,
            Err(ServiceError::Repo(RepositoryError::NotFound))
        ));
    }

    #[tokio::test]
    async fn delete_returns_prior_state() -> TestResult {
        let mut command = MockProductCommandRepositoryTrait::new();
        command
            .expect_delete_product()
            .once()
            .withf(|id| *id == 8)
            .return_once(|id| Ok(with_status(id, ProductStatus::Active)));

        let svc = service(
            MockProductQueryRepositoryTrait::new(),
            command,
            MockImageStorageTrait::new(),
        );
        let response = svc.delete_product(8).await?;

        assert_eq!(response.message, "Success deleted product with id 8");
        assert_eq!(response.payload.status, ProductStatus::Active);

        Ok(())
    }
}
