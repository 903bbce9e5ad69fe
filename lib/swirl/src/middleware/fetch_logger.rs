//! Request logger middleware.
//!
//! Instead of logging hook calls, this middleware replaces the fetcher with a
//! wrapper that logs each actual fetch. Cache hits therefore produce no log
//! line, which makes it handy to see what really goes over the wire.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::time::Instant;
use tower::{Layer, Service};
use tracing::{debug, info, warn};

use crate::{Error, Fetcher, HookRequest, Result, SwrResponse};

/// Layer that wraps the fetcher with a logging fetcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchLoggerLayer {
    _private: (),
}

impl FetchLoggerLayer {
    /// Create a new fetch logger layer.
    #[must_use]
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl<S> Layer<S> for FetchLoggerLayer {
    type Service = FetchLogger<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FetchLogger { inner }
    }
}

/// Hook wrapper that hands a logging fetcher to the next hook.
#[derive(Debug, Clone)]
pub struct FetchLogger<S> {
    inner: S,
}

impl<S> FetchLogger<S> {
    /// Create a new fetch logger wrapping the given hook.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

/// Wrap `fetcher` so that every call is logged.
fn logging_fetcher(fetcher: Fetcher) -> Fetcher {
    fetcher.map(|key, inner| async move {
        let start = Instant::now();
        debug!(key = %key, "fetch started");

        let result = inner.fetch(key.clone()).await;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(data) => info!(key = %key, bytes = data.len(), elapsed_ms, "fetch completed"),
            Err(err) => warn!(key = %key, error = %err, elapsed_ms, "fetch failed"),
        }

        result
    })
}

impl<S> Service<HookRequest> for FetchLogger<S>
where
    S: Service<HookRequest, Response = SwrResponse, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = SwrResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: HookRequest) -> Self::Future {
        let fetcher = logging_fetcher(request.fetcher().clone());
        *request.fetcher_mut() = fetcher;

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(request).await })
    }
}
