//! Seed dataset loading.
//!
//! A seed document is `{"products": [...]}`. It is read once at startup; the
//! store owns the records from then on.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use catalog_core::ProductId;

use crate::product::Product;

const BUNDLED_SEED: &str = include_str!("../data/products.seed.json");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate product id {0} in seed document")]
    DuplicateId(ProductId),
}

#[derive(Debug, Deserialize)]
struct SeedDocument {
    products: Vec<Product>,
}

/// Parse a seed document, rejecting duplicate ids.
pub fn parse_seed(json: &str) -> Result<Vec<Product>, SeedError> {
    let doc: SeedDocument = serde_json::from_str(json)?;

    let mut seen = HashSet::with_capacity(doc.products.len());
    for product in &doc.products {
        if !seen.insert(product.id) {
            return Err(SeedError::DuplicateId(product.id));
        }
    }

    Ok(doc.products)
}

/// Read and parse a seed document from disk.
pub fn load_seed_file(path: &Path) -> Result<Vec<Product>, SeedError> {
    let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let products = parse_seed(&json)?;
    tracing::debug!(path = %path.display(), count = products.len(), "loaded seed file");
    Ok(products)
}

/// The seed dataset compiled into the crate.
pub fn bundled_seed() -> Result<Vec<Product>, SeedError> {
    parse_seed(BUNDLED_SEED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_seed_parses() {
        let products = bundled_seed().unwrap();
        assert_eq!(products.len(), 5);
        assert!(products
            .iter()
            .all(|p| p.attribute("__typename").and_then(|v| v.as_str()) == Some("Product")));
        assert!(products.iter().all(|p| p.attribute("id").is_none()));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let doc = r#"{"products": [
            {"id": 1, "gvtId": 1, "name": "a", "productTagline": "", "shortDescription": "",
             "longDescription": "", "productUrl": "", "voucherTypeName": "", "orderUrl": "", "productTitle": ""},
            {"id": 1, "gvtId": 2, "name": "b", "productTagline": "", "shortDescription": "",
             "longDescription": "", "productUrl": "", "voucherTypeName": "", "orderUrl": "", "productTitle": ""}
        ]}"#;
        match parse_seed(doc) {
            Err(SeedError::DuplicateId(id)) => assert_eq!(id, ProductId::new(1)),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_seed_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn malformed_document_is_parse_error() {
        assert!(matches!(parse_seed("{\"items\": []}"), Err(SeedError::Parse(_))));
    }
}
