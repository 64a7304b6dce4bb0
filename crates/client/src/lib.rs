//! `catalog-client`
//!
//! **Responsibility:** typed access to the catalog HTTP API for UI code.
//!
//! This crate provides:
//! - `ProductsClient`: one method per endpoint
//! - `QueryCache`: results keyed by query, one in-flight request per key
//! - `ProductAccessor`: watchers that re-fetch when their query changes, plus
//!   an imperative update
//!
//! The server stays the authority; nothing here mutates local copies.

pub mod accessor;
pub mod cache;
pub mod error;
pub mod http;

pub use accessor::{
    FetchState, ListingWatch, ProductAccessor, ProductUpdatePayload, ProductWatch, QueryWatch,
    Snapshot,
};
pub use cache::{Fetched, QueryCache};
pub use error::ClientError;
pub use http::ProductsClient;
