use serde::{Deserialize, Serialize};

use catalog_products::{ListingQuery, Product};

// -------------------------
// Request DTOs
// -------------------------

/// Raw listing parameters. Kept as text so that bad numbers fall back to
/// defaults instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl ListProductsParams {
    pub fn to_query(&self) -> ListingQuery {
        ListingQuery::from_params(
            self.page.as_deref(),
            self.limit.as_deref(),
            self.search.as_deref(),
        )
    }
}

// -------------------------
// Response DTOs
// -------------------------

pub const PRODUCT_DELETED: &str = "Product deleted successfully";

#[derive(Debug, Serialize)]
pub struct DeleteProductResponse {
    pub message: &'static str,
    pub product: Product,
}

impl DeleteProductResponse {
    pub fn new(product: Product) -> Self {
        Self {
            message: PRODUCT_DELETED,
            product,
        }
    }
}
