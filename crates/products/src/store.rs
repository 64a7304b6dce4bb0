use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use catalog_core::{DomainError, DomainResult, ProductId};

use crate::product::{Product, ProductDraft, ProductPatch};
use crate::query::{compute_listing, ApiResponse, ListingQuery};

const RESOURCE: &str = "Product";

/// Authoritative in-memory product list, in insertion order.
///
/// Every mutation runs under a single write guard, so id assignment
/// (`max(id) + 1`) and the append that follows are atomic with respect to
/// other requests.
#[derive(Debug, Default)]
pub struct ProductStore {
    inner: RwLock<Vec<Product>>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `products` (order preserved).
    pub fn from_products(products: Vec<Product>) -> Self {
        Self {
            inner: RwLock::new(products),
        }
    }

    // The records are plain values and every mutation is a single Vec
    // operation, so a poisoned lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Product>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Product>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// One page of the (optionally filtered) list.
    pub fn list(&self, query: &ListingQuery) -> ApiResponse<Product> {
        compute_listing(&self.read(), query)
    }

    pub fn get(&self, id: ProductId) -> DomainResult<Product> {
        self.read()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(DomainError::not_found(RESOURCE))
    }

    /// Validate `draft`, assign the next id and append it.
    pub fn create(&self, draft: ProductDraft) -> DomainResult<Product> {
        let mut products = self.write();
        let id = next_id(&products);
        let product = draft.into_product(id)?;
        products.push(product.clone());
        Ok(product)
    }

    /// Merge `patch` over the record with `id`; the id itself never changes.
    pub fn update(&self, id: ProductId, patch: ProductPatch) -> DomainResult<Product> {
        let mut products = self.write();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DomainError::not_found(RESOURCE))?;

        patch.apply_to(product);
        product.id = id;
        Ok(product.clone())
    }

    /// Remove the record with `id` and hand it back.
    pub fn delete(&self, id: ProductId) -> DomainResult<Product> {
        let mut products = self.write();
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or(DomainError::not_found(RESOURCE))?;
        Ok(products.remove(index))
    }
}

/// `max(existing ids, 0) + 1`.
fn next_id(products: &[Product]) -> ProductId {
    products
        .iter()
        .map(|p| p.id)
        .fold(ProductId::new(0), ProductId::max)
        .next()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::product::tests::{draft, product};

    fn names(s: &ProductStore) -> Vec<String> {
        s.list(&ListingQuery::new(1, 100, "").unwrap())
            .data
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    fn store() -> ProductStore {
        ProductStore::from_products(vec![product(1, "Alpha Pass")])
    }

    #[test]
    fn create_assigns_max_plus_one() {
        let s = store();
        let created = s.create(draft("Beta Pass")).unwrap();
        assert_eq!(created.id, ProductId::new(2));
        assert_eq!(s.len(), 2);
        assert_eq!(names(&s), vec!["Alpha Pass", "Beta Pass"]);
    }

    #[test]
    fn create_on_empty_store_starts_at_one() {
        let s = ProductStore::new();
        assert!(s.is_empty());
        assert_eq!(s.create(draft("First")).unwrap().id, ProductId::new(1));
    }

    #[test]
    fn create_after_gap_uses_maximum_not_length() {
        let s = ProductStore::from_products(vec![product(7, "a"), product(3, "b")]);
        assert_eq!(s.create(draft("c")).unwrap().id, ProductId::new(8));
    }

    #[test]
    fn create_with_missing_fields_leaves_store_untouched() {
        let s = store();
        let mut d = draft("Beta Pass");
        d.remove("productUrl");
        assert!(matches!(s.create(d), Err(DomainError::InvalidInput(_))));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn get_unknown_is_not_found() {
        let err = store().get(ProductId::new(999)).unwrap_err();
        assert_eq!(err.to_string(), "Product not found");
    }

    #[test]
    fn update_merges_and_keeps_id() {
        let s = store();
        let before = s.get(ProductId::new(1)).unwrap();
        let patch = ProductPatch::new().with("name", "New Name").with("gvtId", "5");
        let updated = s.update(ProductId::new(1), patch).unwrap();

        assert_eq!(updated.id, ProductId::new(1));
        assert_eq!(updated.name(), "New Name");
        assert_eq!(updated.attribute("gvtId"), Some(&serde_json::json!("5")));
        assert_eq!(
            updated.attribute("shortDescription"),
            before.attribute("shortDescription")
        );
        assert_eq!(s.get(ProductId::new(1)).unwrap(), updated);
    }

    #[test]
    fn update_unknown_is_not_found() {
        let err = store()
            .update(ProductId::new(5), ProductPatch::default())
            .unwrap_err();
        assert_eq!(err, DomainError::not_found("Product"));
    }

    #[test]
    fn delete_removes_exactly_one() {
        let s = ProductStore::from_products(vec![product(1, "a"), product(2, "b"), product(3, "c")]);
        let removed = s.delete(ProductId::new(2)).unwrap();
        assert_eq!(removed.name(), "b");
        assert_eq!(s.len(), 2);

        assert!(s.get(ProductId::new(2)).is_err());
        assert!(s.update(ProductId::new(2), ProductPatch::default()).is_err());
        assert!(s.delete(ProductId::new(2)).is_err());

        assert_eq!(names(&s), vec!["a", "c"]);
    }

    #[test]
    fn list_goes_through_query_engine() {
        let s = ProductStore::from_products(vec![product(1, "Alpha Pass"), product(2, "Beta Pass")]);
        let res = s.list(&ListingQuery::new(1, 1, "beta").unwrap());
        assert_eq!(res.data[0].id, ProductId::new(2));
        assert_eq!(res.pagination.total, 1);
    }

    #[test]
    fn concurrent_creates_get_unique_ids() {
        let s = Arc::new(ProductStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let s = s.clone();
                std::thread::spawn(move || {
                    (0..25)
                        .map(|i| s.create(draft(&format!("p-{t}-{i}"))).unwrap().id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 200);
        assert_eq!(s.len(), 200);
    }
}
