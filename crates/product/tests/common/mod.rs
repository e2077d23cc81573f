#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use chrono::{NaiveDate, Utc};
use product::{
    abstract_trait::product::repository::{
        ProductCommandRepositoryTrait, ProductQueryRepositoryTrait,
    },
    config::UploadConfig,
    di::DependenciesInjectDeps,
    domain::requests::{CreateProductRequest, ProductFilter, UpdateProductRequest},
    handler::AppRouter,
    model::{Product, ProductStatus},
    storage::LocalImageStorage,
};
use serde_json::Value;
use shared::errors::RepositoryError;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tower::ServiceExt;

pub const BOUNDARY: &str = "catalog-test-boundary";

/// Catalog kept in memory, applying the same filter predicate as the SQL.
#[derive(Default)]
pub struct CatalogStore {
    products: Mutex<Vec<Product>>,
}

impl CatalogStore {
    pub fn seeded(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
        }
    }

    async fn select(&self, keep: impl Fn(&Product) -> bool) -> Vec<Product> {
        let products = self.products.lock().await;
        products.iter().filter(|p| keep(p)).cloned().collect()
    }

    async fn modify(
        &self,
        id: i32,
        change: impl FnOnce(&mut Product),
    ) -> Result<Product, RepositoryError> {
        let mut products = self.products.lock().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;

        change(product);
        product.updated_at = Some(Utc::now().naive_utc());
        Ok(product.clone())
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for CatalogStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, RepositoryError> {
        Ok(self.select(|p| p.id == id).await.into_iter().next())
    }

    async fn find_by_brand(&self, brand_id: i32) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.select(|p| p.brand_id == brand_id).await)
    }

    async fn find_by_type(&self, type_id: i32) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.select(|p| p.type_id == type_id).await)
    }

    async fn find_by_material(&self, material_id: i32) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.select(|p| p.material_id == Some(material_id)).await)
    }

    async fn find_filtered(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.select(|p| filter.matches(p)).await)
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for CatalogStore {
    async fn create_product(&self, req: &CreateProductRequest) -> Result<Product, RepositoryError> {
        let mut products = self.products.lock().await;
        let id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let now = Utc::now().naive_utc();

        let product = Product {
            id,
            brand_id: req.brand_id,
            type_id: req.fields.type_id,
            material_id: req.fields.material_id,
            name: req.fields.name.clone(),
            default_pic: req.fields.default_pic.clone(),
            description: req.fields.description.clone(),
            closing_date: req.fields.closing_date,
            status: ProductStatus::Draft,
            created_at: Some(now),
            updated_at: Some(now),
        };

        products.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, req: &UpdateProductRequest) -> Result<Product, RepositoryError> {
        let fields = req.fields.clone();
        self.modify(req.id, move |p| {
            p.type_id = fields.type_id;
            p.material_id = fields.material_id;
            p.name = fields.name;
            p.description = fields.description;
            p.closing_date = fields.closing_date;
            p.default_pic = fields.default_pic;
        })
        .await
    }

    async fn update_status(
        &self,
        id: i32,
        from: ProductStatus,
        to: ProductStatus,
    ) -> Result<Product, RepositoryError> {
        let mut products = self.products.lock().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id && p.status == from)
            .ok_or(RepositoryError::NotFound)?;

        product.status = to;
        product.updated_at = Some(Utc::now().naive_utc());
        Ok(product.clone())
    }

    async fn delete_product(&self, id: i32) -> Result<Product, RepositoryError> {
        let mut products = self.products.lock().await;
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;

        Ok(products.remove(index))
    }
}

pub fn catalog_item(id: i32, brand_id: i32, type_id: i32, material_id: Option<i32>) -> Product {
    Product {
        id,
        brand_id,
        type_id,
        material_id,
        name: format!("product-{id}"),
        default_pic: None,
        description: "desc".into(),
        closing_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        status: ProductStatus::Draft,
        created_at: None,
        updated_at: None,
    }
}

/// Router plus the directory uploaded pictures land in.
pub struct TestApp {
    pub router: Router,
    pub upload_dir: TempDir,
}

pub fn upload_config(dir: &TempDir) -> UploadConfig {
    UploadConfig {
        dir: dir.path().to_path_buf(),
        ..UploadConfig::default()
    }
}

pub fn app_with_store(store: CatalogStore) -> TestApp {
    let upload_dir = TempDir::new().unwrap();
    let upload = upload_config(&upload_dir);
    let store = Arc::new(store);

    let deps = DependenciesInjectDeps {
        query_repo: store.clone(),
        command_repo: store,
        image_storage: Arc::new(LocalImageStorage::new(upload.clone())),
    };

    TestApp {
        router: app_with_deps(deps, upload),
        upload_dir,
    }
}

pub fn app_with_deps(deps: DependenciesInjectDeps, upload: UploadConfig) -> Router {
    let state = product::state::AppState::new(deps, upload);
    AppRouter::build(Arc::new(state))
}

/// A text or file part of a `multipart/form-data` body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn shirt_parts() -> Vec<Part<'static>> {
    vec![
        Part::Text("type_id", "1"),
        Part::Text("name", "Shirt"),
        Part::Text("description", "Organic cotton"),
        Part::Text("closing_date", "2024-01-01"),
    ]
}

pub fn multipart_request(method: Method, uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

pub async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(router, request).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub fn ids(payload: &Value) -> Vec<i64> {
    payload
        .as_array()
        .map(|items| items.iter().filter_map(|p| p["id"].as_i64()).collect())
        .unwrap_or_default()
}
