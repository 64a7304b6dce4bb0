use axum::Router;

pub mod products;
pub mod system;

/// Router for all catalog endpoints.
pub fn router() -> Router {
    Router::new().merge(products::router())
}
