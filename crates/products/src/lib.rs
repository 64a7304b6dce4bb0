//! Products catalog module.
//!
//! This crate holds the product record, the in-memory store the server owns,
//! and the pure listing logic (filtering + pagination). No IO beyond reading a
//! seed document, no HTTP.

pub mod product;
pub mod query;
pub mod seed;
pub mod store;

pub use product::{Product, ProductDraft, ProductPatch, REQUIRED_FIELDS};
pub use query::{compute_listing, ApiResponse, ListingQuery, PaginationInfo, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use seed::{bundled_seed, load_seed_file, parse_seed, SeedError};
pub use store::ProductStore;
