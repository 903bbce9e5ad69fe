//! The terminal hook: cache lookup, fetch, retry.
//!
//! [`CacheHook`] sits at the bottom of every middleware chain built by
//! [`Swr`](crate::Swr). It never calls the fetcher for the null key, serves
//! fresh cache entries directly, and otherwise fetches with the timeout and
//! retry policy of the request's [`Config`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::Service;
use tracing::{debug, warn};

use crate::{Cache, Config, DataSource, Error, Fetcher, HookRequest, Key, Result, SwrResponse};

/// Innermost hook implementation backed by a [`Cache`].
#[derive(Debug, Clone)]
pub struct CacheHook {
    cache: Arc<Cache>,
}

impl CacheHook {
    /// Create a terminal hook over the given cache.
    #[must_use]
    pub fn new(cache: Arc<Cache>) -> Self {
        Self { cache }
    }

    /// The cache this hook reads and writes.
    #[must_use]
    pub fn cache(&self) -> &Arc<Cache> {
        &self.cache
    }

    async fn resolve(cache: Arc<Cache>, request: HookRequest) -> Result<SwrResponse> {
        let (key, fetcher, config) = request.into_parts();
        let Some(id) = key.serialize() else {
            return Ok(SwrResponse::empty(key));
        };

        if let Some(entry) = cache.get(&id) {
            let age = entry.age();
            if age < config.dedupe_interval || !config.revalidate_if_stale {
                debug!(key = %id, ?age, "serving from cache");
                return Ok(SwrResponse::new(key, entry.into_data(), DataSource::Cache));
            }
        }

        let data = fetch_with_retry(&fetcher, &key, &config).await?;
        cache.insert(id, data.clone());
        Ok(SwrResponse::new(key, data, DataSource::Fetched))
    }
}

/// Call `fetcher`, bounded by the timeout and retried per `config`.
async fn fetch_with_retry(fetcher: &Fetcher, key: &Key, config: &Config) -> Result<Bytes> {
    let mut attempt = 0;
    loop {
        let fetch = fetcher.fetch(key.clone());
        let result = match config.fetch_timeout {
            Some(timeout) => tokio::time::timeout(timeout, fetch)
                .await
                .unwrap_or(Err(Error::Timeout)),
            None => fetch.await,
        };

        match result {
            Err(err) if err.is_retryable() && attempt < config.error_retry_count => {
                attempt += 1;
                warn!(key = %key, attempt, error = %err, "fetch failed, retrying");
                tokio::time::sleep(config.error_retry_interval).await;
            }
            result => return result,
        }
    }
}

impl Service<HookRequest> for CacheHook {
    type Response = SwrResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send + 'static>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: HookRequest) -> Self::Future {
        Box::pin(Self::resolve(Arc::clone(&self.cache), request))
    }
}
