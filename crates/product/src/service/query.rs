use crate::{
    abstract_trait::product::{
        repository::DynProductQueryRepository, service::ProductQueryServiceTrait,
    },
    domain::{
        requests::ProductFilter,
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
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductQueryService {
    pub query: DynProductQueryRepository,
    pub metrics: Metrics,
}

impl ProductQueryService {
    pub fn new(query: DynProductQueryRepository, metrics: Metrics) -> Self {
        Self { query, metrics }
    }

    fn complete(&self, operation: &str, started: Instant, result: &Result<usize, String>) {
        let elapsed = started.elapsed().as_secs_f64();

        let status = match result {
            Ok(count) => {
                info!("✅ {operation} returned {count} product(s)");
                Status::Success
            }
            Err(msg) => {
                error!("❌ {operation} failed: {msg}");
                Status::Error
            }
        };

        self.metrics.record(operation, Method::Get, status, elapsed);
    }

    fn list(
        &self,
        operation: &str,
        message: String,
        fetched: Result<Vec<ProductModel>, RepositoryError>,
        started: Instant,
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError> {
        match fetched {
            Ok(products) => {
                self.complete(operation, started, &Ok(products.len()));
                let data = products.into_iter().map(ProductResponse::from).collect();
                Ok(ApiResponse::new(message, data))
            }
            Err(e) => {
                self.complete(operation, started, &Err(format!("{e:?}")));
                Err(ServiceError::Repo(e))
            }
        }
    }
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🆔 Finding product by ID: {id}");
        let started = Instant::now();

        let product = match self.query.find_by_id(id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                self.complete("find_by_id", started, &Err(format!("product {id} not found")));
                return Err(ServiceError::Repo(RepositoryError::NotFound));
            }
            Err(e) => {
                self.complete("find_by_id", started, &Err(format!("{e:?}")));
                return Err(ServiceError::Repo(e));
            }
        };

        self.complete("find_by_id", started, &Ok(1));

        Ok(ApiResponse::new(
            format!("Success, retrieved product with id #{id}"),
            ProductResponse::from(product),
        ))
    }

    async fn find_by_brand(
        &self,
        brand_id: i32,
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError> {
        let started = Instant::now();
        let fetched = self.query.find_by_brand(brand_id).await;

        self.list(
            "find_by_brand",
            format!("Success retrieved all products for brand with id #{brand_id}"),
            fetched,
            started,
        )
    }

    async fn find_by_type(
        &self,
        type_id: i32,
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError> {
        let started = Instant::now();
        let fetched = self.query.find_by_type(type_id).await;

        self.list(
            "find_by_type",
            format!("Success, retrieved all products by type with id #{type_id}"),
            fetched,
            started,
        )
    }

    async fn find_by_material(
        &self,
        material_id: i32,
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError> {
        let started = Instant::now();
        let fetched = self.query.find_by_material(material_id).await;

        self.list(
            "find_by_material",
            format!("Success, retrieved all products by material with id #{material_id}"),
            fetched,
            started,
        )
    }

    async fn find_filtered(
        &self,
        filter: &ProductFilter,
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError> {
        let started = Instant::now();

        if filter.is_unfiltered() {
            info!("🔍 No filter set, listing the whole catalog");
        }

        let fetched = self.query.find_filtered(filter).await;

        self.list(
            "find_filtered",
            "Success, retrieved all products with filters".to_string(),
            fetched,
            started,
        )
    }
}
