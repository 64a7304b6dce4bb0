//! `catalog-core`: shared domain primitives for the product catalog.
//!
//! This crate contains **pure domain** types (no HTTP, no storage).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{parse_leading_int, ProductId};
