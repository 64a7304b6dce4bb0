//! Filtered, paginated views over the product list.
//!
//! Everything here is a pure function of its inputs; the store hands in a
//! borrowed slice under its read guard.

use serde::{Deserialize, Serialize};

use catalog_core::{parse_leading_int, DomainError, DomainResult};

use crate::product::Product;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// Parameters of a listing request.
///
/// `page` and `limit` are always at least 1. The serialized form (`search`
/// omitted when empty) doubles as the client-side cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ListingQuery {
    page: usize,
    limit: usize,
    #[serde(skip_serializing_if = "String::is_empty")]
    search: String,
}

impl ListingQuery {
    pub fn new(page: usize, limit: usize, search: impl Into<String>) -> DomainResult<Self> {
        if page == 0 {
            return Err(DomainError::invalid_input("page must be at least 1"));
        }
        if limit == 0 {
            return Err(DomainError::invalid_input("limit must be at least 1"));
        }
        Ok(Self {
            page,
            limit,
            search: search.into(),
        })
    }

    /// Build a query from raw request parameters.
    ///
    /// `page`/`limit` take the integer prefix of their text; absent,
    /// non-numeric, zero or negative values fall back to the defaults.
    pub fn from_params(page: Option<&str>, limit: Option<&str>, search: Option<&str>) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_LIMIT),
            search: search.unwrap_or_default().to_string(),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn with_page(self, page: usize) -> DomainResult<Self> {
        Self::new(page, self.limit, self.search)
    }

    pub fn with_limit(self, limit: usize) -> DomainResult<Self> {
        Self::new(self.page, limit, self.search)
    }

    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self
        }
    }

    /// Stable key identifying this query (its JSON form).
    pub fn cache_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!("{{\"page\":{},\"limit\":{},\"search\":{:?}}}", self.page, self.limit, self.search)
        })
    }

    fn matches(&self, product: &Product, needle: &str) -> bool {
        needle.is_empty() || product.name().to_lowercase().contains(needle)
    }
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: String::new(),
        }
    }
}

fn positive_or(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(parse_leading_int)
        .and_then(|v| usize::try_from(v).ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

/// Page metadata, derived per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

/// Listing envelope: one page of data plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationInfo,
}

/// Filter `products` by case-insensitive name substring, then cut out the
/// requested page. Pages past the end are empty, not an error.
pub fn compute_listing(products: &[Product], query: &ListingQuery) -> ApiResponse<Product> {
    let needle = query.search.to_lowercase();
    let filtered: Vec<&Product> = products
        .iter()
        .filter(|p| query.matches(p, &needle))
        .collect();

    let total = filtered.len();
    let start = (query.page - 1).saturating_mul(query.limit);

    let data = filtered
        .into_iter()
        .skip(start)
        .take(query.limit)
        .cloned()
        .collect();

    ApiResponse {
        data,
        pagination: PaginationInfo {
            total,
            page: query.page,
            limit: query.limit,
            total_pages: total.div_ceil(query.limit),
        },
    }
}
