//! Reactive product accessors.
//!
//! A watcher owns a background task that fetches whatever its current key is
//! (a listing query or a product id) and re-fetches whenever the key changes.
//! Results go through the shared [`QueryCache`], so identical queries issued
//! by different watchers reach the server once.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use catalog_core::{DomainResult, ProductId};
use catalog_products::{ApiResponse, ListingQuery, Product, ProductPatch};

use crate::cache::{Fetched, QueryCache};
use crate::error::ClientError;
use crate::http::ProductsClient;

/// Fields a caller may change through [`ProductAccessor::update_product`].
pub type ProductUpdatePayload = ProductPatch;

/// Where a watcher's current fetch stands.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Pending,
    Ready(Fetched<T>),
    Failed(ClientError),
}

impl<T: Clone> FetchState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(fetched) => Some(&fetched.data),
            _ => None,
        }
    }

    fn to_result(&self) -> Option<Result<Fetched<T>, ClientError>> {
        match self {
            Self::Pending => None,
            Self::Ready(fetched) => Some(Ok(fetched.clone())),
            Self::Failed(err) => Some(Err(err.clone())),
        }
    }
}

/// State published by a watcher, tagged with the request it answers.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<K, T> {
    pub generation: u64,
    pub key: K,
    pub state: FetchState<T>,
}

#[derive(Debug, Clone, PartialEq)]
struct Request<K> {
    generation: u64,
    key: K,
    /// Bypass the cache for this request.
    reload: bool,
}

/// Handle to a background fetch loop keyed by `K`.
///
/// Dropping the handle stops the loop.
pub struct QueryWatch<K, T> {
    requests: watch::Sender<Request<K>>,
    states: watch::Receiver<Snapshot<K, T>>,
    task: JoinHandle<()>,
}

/// Paginated, searchable product listing.
pub type ListingWatch = QueryWatch<ListingQuery, ApiResponse<Product>>;

/// A single product by id.
pub type ProductWatch = QueryWatch<ProductId, Product>;

impl<K, T> QueryWatch<K, T>
where
    K: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Must be called from within a tokio runtime. `fetch` receives the key
    /// and whether the cached result must be discarded first.
    fn spawn<F, Fut>(initial: K, fetch: F) -> Self
    where
        F: Fn(K, bool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Fetched<T>, ClientError>> + Send + 'static,
    {
        let (requests, request_rx) = watch::channel(Request {
            generation: 0,
            key: initial.clone(),
            reload: false,
        });
        let (state_tx, states) = watch::channel(Snapshot {
            generation: 0,
            key: initial,
            state: FetchState::Pending,
        });

        let task = tokio::spawn(drive(request_rx, state_tx, fetch));

        Self {
            requests,
            states,
            task,
        }
    }

    /// The key currently being watched.
    pub fn key(&self) -> K {
        self.requests.borrow().key.clone()
    }

    /// Switch to `key`. Setting the current key again does nothing.
    pub fn set_key(&self, key: K) {
        self.requests.send_if_modified(|req| {
            if req.key == key {
                return false;
            }
            req.key = key;
            req.generation += 1;
            req.reload = false;
            true
        });
    }

    /// Drop the cached result for the current key and fetch it again.
    pub fn refresh(&self) {
        self.requests.send_modify(|req| {
            req.generation += 1;
            req.reload = true;
        });
    }

    /// Latest published state (may belong to a superseded key).
    pub fn snapshot(&self) -> Snapshot<K, T> {
        self.states.borrow().clone()
    }

    /// Wait for the outcome of the most recent key change or refresh.
    pub async fn settled(&self) -> Result<Fetched<T>, ClientError> {
        let generation = self.requests.borrow().generation;
        let mut states = self.states.clone();
        let snapshot = states
            .wait_for(|s| s.generation == generation && !s.state.is_pending())
            .await
            .map_err(|_| ClientError::Closed)?;
        snapshot.state.to_result().unwrap_or(Err(ClientError::Closed))
    }
}

impl<K, T> Drop for QueryWatch<K, T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl ListingWatch {
    pub fn query(&self) -> ListingQuery {
        self.key()
    }

    pub fn set_page(&self, page: usize) -> DomainResult<()> {
        let next = self.key().with_page(page)?;
        self.set_key(next);
        Ok(())
    }

    pub fn set_limit(&self, limit: usize) -> DomainResult<()> {
        let next = self.key().with_limit(limit)?;
        self.set_key(next);
        Ok(())
    }

    pub fn set_search(&self, search: impl Into<String>) {
        let next = self.key().with_search(search);
        self.set_key(next);
    }
}

impl ProductWatch {
    pub fn set_id(&self, id: ProductId) {
        self.set_key(id);
    }
}

/// Fetch loop: publish `Pending`, fetch, publish the outcome, wait for the
/// next request. A request that arrives mid-fetch abandons the stale fetch.
async fn drive<K, T, F, Fut>(
    mut requests: watch::Receiver<Request<K>>,
    states: watch::Sender<Snapshot<K, T>>,
    fetch: F,
) where
    K: Clone,
    F: Fn(K, bool) -> Fut,
    Fut: Future<Output = Result<Fetched<T>, ClientError>>,
{
    loop {
        let Request {
            generation,
            key,
            reload,
        } = requests.borrow_and_update().clone();
        states.send_replace(Snapshot {
            generation,
            key: key.clone(),
            state: FetchState::Pending,
        });

        let outcome = tokio::select! {
            result = fetch(key.clone(), reload) => Some(result),
            changed = requests.changed() => {
                if changed.is_err() {
                    return;
                }
                None
            }
        };

        let Some(result) = outcome else {
            continue;
        };

        let state = match result {
            Ok(fetched) => FetchState::Ready(fetched),
            Err(err) => FetchState::Failed(err),
        };
        states.send_replace(Snapshot {
            generation,
            key,
            state,
        });

        if requests.changed().await.is_err() {
            return;
        }
    }
}

fn product_key(id: ProductId) -> String {
    format!("product-{id}")
}

/// Entry point for UI code: the HTTP client plus the caches its watchers share.
#[derive(Debug)]
pub struct ProductAccessor {
    client: ProductsClient,
    listings: QueryCache<ApiResponse<Product>>,
    products: QueryCache<Product>,
}

impl ProductAccessor {
    pub fn new(client: ProductsClient) -> Arc<Self> {
        Arc::new(Self {
            client,
            listings: QueryCache::new(),
            products: QueryCache::new(),
        })
    }

    /// Cached listing for `query` (fetched on miss).
    pub async fn fetch_listing(
        &self,
        query: &ListingQuery,
    ) -> Result<Fetched<ApiResponse<Product>>, ClientError> {
        self.listings
            .get_or_fetch(&query.cache_key(), || self.client.list(query))
            .await
    }

    /// Cached product `id` (fetched on miss).
    pub async fn fetch_product(&self, id: ProductId) -> Result<Fetched<Product>, ClientError> {
        self.products
            .get_or_fetch(&product_key(id), || self.client.get(id))
            .await
    }

    /// Watch a listing; re-fetches whenever page, limit or search change.
    pub fn use_products(self: &Arc<Self>, initial: ListingQuery) -> ListingWatch {
        let this = Arc::clone(self);
        QueryWatch::spawn(initial, move |query: ListingQuery, reload| {
            let this = Arc::clone(&this);
            async move {
                if reload {
                    this.listings.invalidate(&query.cache_key()).await;
                }
                this.fetch_listing(&query).await
            }
        })
    }

    /// Watch one product; re-fetches whenever the id changes.
    pub fn use_product_by_id(self: &Arc<Self>, id: ProductId) -> ProductWatch {
        let this = Arc::clone(self);
        QueryWatch::spawn(id, move |id: ProductId, reload| {
            let this = Arc::clone(&this);
            async move {
                if reload {
                    this.products.invalidate(&product_key(id)).await;
                }
                this.fetch_product(id).await
            }
        })
    }

    /// PUT `payload` onto product `id`.
    ///
    /// A failure is logged and returned unchanged; there is no retry. On
    /// success the cached copy of the product and all cached listings are
    /// dropped, so watchers see the change on their next fetch or refresh.
    pub async fn update_product(
        &self,
        id: ProductId,
        payload: &ProductUpdatePayload,
    ) -> Result<Product, ClientError> {
        match self.client.update(id, payload).await {
            Ok(product) => {
                self.products.invalidate(&product_key(id)).await;
                self.listings.clear();
                Ok(product)
            }
            Err(err) => {
                tracing::error!(product_id = %id, error = %err, "error updating product");
                Err(err)
            }
        }
    }
}
