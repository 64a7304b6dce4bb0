//! HTTP client for the catalog API.

use std::time::Duration;

use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use catalog_core::ProductId;
use catalog_products::{ApiResponse, ListingQuery, Product, ProductDraft, ProductPatch};

use crate::error::ClientError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error envelope the API returns on failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_message: String,
}

#[derive(Debug, Deserialize)]
struct DeletedBody {
    product: Product,
}

/// Typed client for `/api/products`.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ProductsClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProductsClient {
    /// Client for the API served at `base_url` (e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| {
            tracing::error!("invalid URL constructed: {e}");
            ClientError::InvalidUrl(raw)
        })
    }

    fn item_url(&self, id: ProductId) -> Result<Url, ClientError> {
        self.url(&format!("/api/products/{id}"))
    }

    /// One page of products. `search` is only sent when non-empty.
    pub async fn list(&self, query: &ListingQuery) -> Result<ApiResponse<Product>, ClientError> {
        let mut url = self.url("/api/products")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("page", &query.page().to_string())
                .append_pair("limit", &query.limit().to_string());
            if !query.search().is_empty() {
                pairs.append_pair("search", query.search());
            }
        }
        self.send(self.http.get(url)).await
    }

    pub async fn get(&self, id: ProductId) -> Result<Product, ClientError> {
        self.send(self.http.get(self.item_url(id)?)).await
    }

    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, ClientError> {
        self.send(self.http.post(self.url("/api/products")?).json(draft))
            .await
    }

    pub async fn update(&self, id: ProductId, patch: &ProductPatch) -> Result<Product, ClientError> {
        self.send(self.http.put(self.item_url(id)?).json(patch)).await
    }

    /// Delete a product, returning the removed record.
    pub async fn delete(&self, id: ProductId) -> Result<Product, ClientError> {
        let body: DeletedBody = self.send(self.http.delete(self.item_url(id)?)).await?;
        Ok(body.product)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = req
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.status_message)
                .unwrap_or_else(|_| truncate_body(&body));
            tracing::debug!(status = status.as_u16(), %message, "catalog API returned an error");
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str::<T>(&body).map_err(|e| {
            tracing::error!("failed to parse response: {} | body: {}", e, truncate_body(&body));
            ClientError::Decode(e.to_string())
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 500;
    match body.char_indices().nth(MAX) {
        None => body.to_string(),
        Some((cut, _)) => format!("{}...[truncated]", &body[..cut]),
    }
}
