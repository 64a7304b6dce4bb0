//! Bounded query cache with per-key request coalescing.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache;

use crate::error::ClientError;

const DEFAULT_MAX_CAPACITY: u64 = 1_000;
const DEFAULT_TIME_TO_LIVE: Duration = Duration::from_secs(300);

/// A fetched value and when it arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub fetched_at: DateTime<Utc>,
}

impl<T> Fetched<T> {
    pub fn now(data: T) -> Self {
        Self {
            data,
            fetched_at: Utc::now(),
        }
    }
}

/// Results keyed by a serialized query.
///
/// Concurrent lookups of the same key share one in-flight fetch. Successful
/// results are kept until invalidated, evicted, or older than the
/// time-to-live; failures are never stored.
pub struct QueryCache<T> {
    entries: Cache<String, Fetched<T>>,
}

impl<T> fmt::Debug for QueryCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl<T> QueryCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// 1000 entries, five minutes each.
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_CAPACITY, DEFAULT_TIME_TO_LIVE)
    }

    pub fn with_limits(max_capacity: u64, time_to_live: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(time_to_live)
                .build(),
        }
    }

    /// Cached value for `key`, or the result of `fetch` (shared with any
    /// concurrent caller of the same key).
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<Fetched<T>, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        self.entries
            .try_get_with(key.to_owned(), async move { fetch().await.map(Fetched::now) })
            .await
            .map_err(Arc::unwrap_or_clone)
    }

    /// Cached value for `key`, if a fetch already completed.
    pub async fn get(&self, key: &str) -> Option<Fetched<T>> {
        self.entries.get(key).await
    }

    /// Drop the entry for `key`; the next lookup fetches again.
    pub async fn invalidate(&self, key: &str) {
        self.entries.invalidate(key).await;
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl<T> Default for QueryCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
