use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Extension, Path, Query},
    routing::{any, get},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use catalog_core::{DomainError, ProductId};
use catalog_products::{ApiResponse, ListingQuery, Product, ProductDraft, ProductPatch};

use crate::app::dto::{DeleteProductResponse, ListProductsParams};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route(
            "/api/products",
            get(list_products)
                .post(create_product)
                .fallback(method_not_allowed),
        )
        .route("/api/products/", any(missing_product_id))
        .route(
            "/api/products/:id",
            get(get_product)
                .put(update_product)
                .delete(delete_product)
                .fallback(method_not_allowed),
        )
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<ListProductsParams>, QueryRejection>,
) -> Json<ApiResponse<Product>> {
    let query = match params {
        Ok(Query(params)) => params.to_query(),
        Err(e) => {
            tracing::debug!("unreadable query string, using defaults: {e}");
            ListingQuery::default()
        }
    };
    Json(services.products_list(&query))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Bytes,
) -> Result<Json<Product>, ApiError> {
    let draft: ProductDraft = parse_body(&body)?;
    Ok(Json(services.products_create(draft)?))
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = resolve_id(&raw_id)?;
    Ok(Json(services.products_get(id)?))
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Product>, ApiError> {
    let id = resolve_id(&raw_id)?;
    let patch: ProductPatch = parse_body(&body)?;
    Ok(Json(services.products_update(id, patch)?))
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteProductResponse>, ApiError> {
    let id = resolve_id(&raw_id)?;
    let product = services.products_delete(id)?;
    Ok(Json(DeleteProductResponse::new(product)))
}

pub async fn missing_product_id() -> ApiError {
    DomainError::invalid_id("Product ID is required").into()
}

pub async fn method_not_allowed() -> ApiError {
    DomainError::MethodNotAllowed.into()
}

/// Path id → product id. Blank is a bad request; text that does not start
/// with a number can never match a record, so it is reported as not found.
fn resolve_id(raw: &str) -> Result<ProductId, ApiError> {
    if raw.trim().is_empty() {
        return Err(DomainError::invalid_id("Product ID is required").into());
    }
    ProductId::parse_leading(raw).ok_or_else(|| DomainError::not_found("Product").into())
}

/// Decode a JSON object body. An empty body or `null` is an empty object;
/// the content type is not checked.
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    let value: Value = serde_json::from_slice(body).map_err(invalid_body)?;
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value).map_err(invalid_body)
}

fn invalid_body(err: serde_json::Error) -> ApiError {
    DomainError::invalid_input(format!("Invalid request body: {err}")).into()
}
