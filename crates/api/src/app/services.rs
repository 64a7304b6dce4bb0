use catalog_core::{DomainResult, ProductId};
use catalog_products::{
    bundled_seed, load_seed_file, ApiResponse, ListingQuery, Product, ProductDraft, ProductPatch,
    ProductStore, SeedError,
};

use crate::config::ApiConfig;

/// Process-wide services shared by all handlers.
///
/// Constructed once at startup and handed to the router; tests build their
/// own instance per server.
#[derive(Debug, Default)]
pub struct AppServices {
    store: ProductStore,
}

impl AppServices {
    pub fn new(store: ProductStore) -> Self {
        Self { store }
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self::new(ProductStore::from_products(products))
    }

    /// Services seeded from the configured seed file, or the bundled seed.
    pub fn from_config(config: &ApiConfig) -> Result<Self, SeedError> {
        let products = match &config.seed_path {
            Some(path) => load_seed_file(path)?,
            None => bundled_seed()?,
        };
        Ok(Self::with_products(products))
    }

    pub fn products_count(&self) -> usize {
        self.store.len()
    }

    pub fn products_list(&self, query: &ListingQuery) -> ApiResponse<Product> {
        self.store.list(query)
    }

    pub fn products_get(&self, id: ProductId) -> DomainResult<Product> {
        self.store.get(id)
    }

    pub fn products_create(&self, draft: ProductDraft) -> DomainResult<Product> {
        let product = self.store.create(draft)?;
        tracing::info!(product_id = %product.id, name = product.name(), "product created");
        Ok(product)
    }

    pub fn products_update(&self, id: ProductId, patch: ProductPatch) -> DomainResult<Product> {
        let product = self.store.update(id, patch)?;
        tracing::info!(product_id = %id, "product updated");
        Ok(product)
    }

    pub fn products_delete(&self, id: ProductId) -> DomainResult<Product> {
        let product = self.store.delete(id)?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(product)
    }
}
