use crate::{
    abstract_trait::product::service::{DynProductCommandService, DynProductQueryService},
    domain::{
        requests::{ProductFilter, ProductUploadForm, parse_id},
        response::{api::ApiResponse, product::ProductResponse},
    },
    middleware::multipart::ProductMultipart,
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use shared::errors::{ErrorResponse, HttpError};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/products/{id}/all",
    tag = "Product",
    params(("id" = String, Path, description = "Brand ID")),
    responses(
        (status = 200, description = "Products of the brand", body = ApiResponse<Vec<ProductResponse>>),
        (status = 400, description = "Malformed brand ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_products_by_brand(
    Extension(service): Extension<DynProductQueryService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let brand_id = parse_id("brand_id", &id)?;
    let response = service.find_by_brand(brand_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/products/type/{id}",
    tag = "Product",
    params(("id" = String, Path, description = "Product type ID")),
    responses(
        (status = 200, description = "Products of the type", body = ApiResponse<Vec<ProductResponse>>),
        (status = 400, description = "Malformed type ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_products_by_type(
    Extension(service): Extension<DynProductQueryService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let type_id = parse_id("type_id", &id)?;
    let response = service.find_by_type(type_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/products/material/{id}",
    tag = "Product",
    params(("id" = String, Path, description = "Material ID")),
    responses(
        (status = 200, description = "Products made of the material", body = ApiResponse<Vec<ProductResponse>>),
        (status = 400, description = "Malformed material ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_products_by_material(
    Extension(service): Extension<DynProductQueryService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let material_id = parse_id("material_id", &id)?;
    let response = service.find_by_material(material_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/products/filters/{brand_id}/{type_id}/{material_id}",
    tag = "Product",
    params(
        ("brand_id" = String, Path, description = "Brand ID, 0 for any"),
        ("type_id" = String, Path, description = "Product type ID, 0 for any"),
        ("material_id" = String, Path, description = "Material ID, 0 for any")
    ),
    responses(
        (status = 200, description = "Products matching every set filter", body = ApiResponse<Vec<ProductResponse>>),
        (status = 400, description = "Malformed filter ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_filtered_products(
    Extension(service): Extension<DynProductQueryService>,
    Path((brand_id, type_id, material_id)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, HttpError> {
    let filter = ProductFilter::parse(&brand_id, &type_id, &material_id)?;
    let response = service.find_filtered(&filter).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Product",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Malformed product ID", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn get_product(
    Extension(service): Extension<DynProductQueryService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let id = parse_id("product_id", &id)?;
    let response = service.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/products/add/{id}",
    tag = "Product",
    params(("id" = String, Path, description = "Brand ID")),
    request_body(content = ProductUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product created", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Malformed field", body = ErrorResponse),
        (status = 403, description = "Missing information", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_product(
    Extension(service): Extension<DynProductCommandService>,
    Path(id): Path<String>,
    body: ProductMultipart,
) -> Result<impl IntoResponse, HttpError> {
    let brand_id = parse_id("brand_id", &id)?;
    let response = service
        .create_product(brand_id, body.form, body.image)
        .await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Product",
    params(("id" = String, Path, description = "Product ID")),
    request_body(content = ProductUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Malformed field", body = ErrorResponse),
        (status = 403, description = "Missing information", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn update_product(
    Extension(service): Extension<DynProductCommandService>,
    Path(id): Path<String>,
    body: ProductMultipart,
) -> Result<impl IntoResponse, HttpError> {
    let id = parse_id("product_id", &id)?;
    let response = service.update_product(id, body.form, body.image).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    tag = "Product",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Status advanced (draft, active, closed)", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Malformed product ID", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 409, description = "Product already closed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn update_product_status(
    Extension(service): Extension<DynProductCommandService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let id = parse_id("product_id", &id)?;
    let response = service.update_status(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Product",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Deleted product", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Malformed product ID", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_product(
    Extension(service): Extension<DynProductCommandService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let id = parse_id("product_id", &id)?;
    let response = service.delete_product(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn product_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route(
            "/api/products/filters/{brand_id}/{type_id}/{material_id}",
            get(get_filtered_products),
        )
        .route("/api/products/type/{id}", get(get_products_by_type))
        .route("/api/products/material/{id}", get(get_products_by_material))
        .route("/api/products/add/{id}", post(create_product))
        .route("/api/products/{id}/all", get(get_products_by_brand))
        .route(
            "/api/products/{id}",
            get(get_product)
                .put(update_product)
                .patch(update_product_status)
                .delete(delete_product),
        )
        .layer(Extension(app_state.di_container.product_query.clone()))
        .layer(Extension(app_state.di_container.product_command.clone()))
}
