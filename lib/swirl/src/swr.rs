//! The `Swr` entry point: root scope, nested scopes, hook creation.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tower::util::BoxCloneService;
use tower::{Layer, Service};
use tracing::debug;

use crate::middleware::{
    BoxedHook, ConcurrencyLimitLayer, FetchLoggerLayer, KeepPreviousDataLayer, LoggingLayer,
    Middleware, SerializeKeyLayer, compose,
};
use crate::terminal::CacheHook;
use crate::{Cache, Error, Hook, HookRequest, Key, SwrConfig, SwrResponse};

#[cfg(feature = "middleware-metrics")]
use crate::middleware::MetricsLayer;

/// A configuration scope bound to a cache.
///
/// The root `Swr` is built with [`Swr::builder`]. [`Swr::scope`] nests a
/// scope inside it; every scope shares the root's cache. Hooks created from a
/// scope run the scope's middleware, outer scopes first.
///
/// # Example
///
/// ```ignore
/// use swirl::{Swr, SwrConfig};
/// use swirl::middleware::KeepPreviousDataLayer;
///
/// let swr = Swr::builder().with_logging().build();
/// let page = swr.scope(SwrConfig::new().layer(KeepPreviousDataLayer::new()));
///
/// let hook = page.hook();
/// let user = hook.call("/api/user", fetcher.clone()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Swr {
    cache: Arc<Cache>,
    config: SwrConfig,
}

impl Swr {
    /// Create a root scope with default configuration and no middleware.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new builder.
    #[must_use]
    pub fn builder() -> SwrBuilder {
        SwrBuilder::default()
    }

    /// Nest `inner` inside this scope.
    #[must_use]
    pub fn scope(&self, inner: SwrConfig) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            config: self.config.merge(&inner),
        }
    }

    /// Merged configuration of this scope.
    #[must_use]
    pub const fn config(&self) -> &SwrConfig {
        &self.config
    }

    /// The shared cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<Cache> {
        &self.cache
    }

    /// Create a hook running this scope's middleware.
    #[must_use]
    pub fn hook(&self) -> Hook {
        self.hook_with(&[])
    }

    /// Create a hook with call-site middleware.
    ///
    /// `local` middleware run after every scope middleware, right before the
    /// terminal hook.
    #[must_use]
    pub fn hook_with(&self, local: &[Middleware]) -> Hook {
        let chain: Vec<Middleware> = self
            .config
            .middleware()
            .iter()
            .chain(local)
            .cloned()
            .collect();
        debug!(
            middleware = ?chain.iter().map(Middleware::name).collect::<Vec<_>>(),
            "composing hook"
        );

        let terminal: BoxedHook = BoxCloneService::new(CacheHook::new(Arc::clone(&self.cache)));
        Hook::new(compose(&chain, terminal), self.config.resolve())
    }

    /// Write `data` into the cache for `key`.
    ///
    /// Returns `false` for the null key, which cannot be cached.
    pub fn mutate(&self, key: &Key, data: Bytes) -> bool {
        match key.serialize() {
            Some(id) => {
                self.cache.insert(id, data);
                true
            }
            None => false,
        }
    }

    /// Drop the cached data for `key`, forcing the next call to fetch.
    ///
    /// Returns `true` if an entry was removed.
    pub fn invalidate(&self, key: &Key) -> bool {
        key.serialize()
            .is_some_and(|id| self.cache.remove(&id).is_some())
    }
}

impl Default for Swr {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the root [`Swr`] scope.
///
/// # Example
///
/// ```ignore
/// use swirl::Swr;
/// use std::time::Duration;
///
/// let swr = Swr::builder()
///     .dedupe_interval(Duration::from_secs(5))
///     .error_retry_count(2)
///     .with_logging()
///     .with_serialize_key()
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct SwrBuilder {
    config: SwrConfig,
    cache: Option<Arc<Cache>>,
}

impl SwrBuilder {
    // ========================================================================
    // Core Configuration
    // ========================================================================

    /// Set the dedupe interval.
    #[must_use]
    pub fn dedupe_interval(mut self, interval: Duration) -> Self {
        self.config = self.config.dedupe_interval(interval);
        self
    }

    /// Set the number of retries on error.
    #[must_use]
    pub fn error_retry_count(mut self, count: u32) -> Self {
        self.config = self.config.error_retry_count(count);
        self
    }

    /// Set the delay between retries.
    #[must_use]
    pub fn error_retry_interval(mut self, interval: Duration) -> Self {
        self.config = self.config.error_retry_interval(interval);
        self
    }

    /// Set the timeout of a single fetch attempt.
    #[must_use]
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.fetch_timeout(timeout);
        self
    }

    /// Set whether stale data is revalidated.
    #[must_use]
    pub fn revalidate_if_stale(mut self, revalidate: bool) -> Self {
        self.config = self.config.revalidate_if_stale(revalidate);
        self
    }

    /// Use an existing cache instead of a fresh one.
    #[must_use]
    pub fn cache(mut self, cache: Arc<Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    // ========================================================================
    // Generic Middleware API
    // ========================================================================

    /// Append a middleware to the root `use_` list.
    ///
    /// Middleware run in the order they are added: first added = outermost.
    #[must_use]
    pub fn with(mut self, middleware: Middleware) -> Self {
        self.config = self.config.with(middleware);
        self
    }

    /// Append a Tower layer to the root `use_` list.
    #[must_use]
    pub fn layer<L>(self, layer: L) -> Self
    where
        L: Layer<BoxedHook> + Send + Sync + 'static,
        L::Service: Service<HookRequest, Response = SwrResponse, Error = Error>
            + Clone
            + Send
            + 'static,
        <L::Service as Service<HookRequest>>::Future: Send + 'static,
    {
        self.with(Middleware::layer(layer))
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    /// Log every hook call.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Log every hook call at debug level, including its config.
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Log every actual fetch.
    #[must_use]
    pub fn with_fetch_logger(self) -> Self {
        self.layer(FetchLoggerLayer::new())
    }

    /// Keep returning the previous data while the current key has none.
    #[must_use]
    pub fn with_keep_previous_data(self) -> Self {
        self.layer(KeepPreviousDataLayer::new())
    }

    /// Serialize structured keys into stable string keys.
    #[must_use]
    pub fn with_serialize_key(self) -> Self {
        self.layer(SerializeKeyLayer::new())
    }

    /// Limit the number of concurrent calls per hook.
    #[must_use]
    pub fn with_concurrency_limit(self, max: usize) -> Self {
        self.layer(ConcurrencyLimitLayer::new(max))
    }

    /// Record hook metrics.
    #[cfg(feature = "middleware-metrics")]
    #[must_use]
    pub fn with_metrics(self) -> Self {
        self.layer(MetricsLayer::new())
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the root scope.
    #[must_use]
    pub fn build(self) -> Swr {
        Swr {
            cache: self.cache.unwrap_or_default(),
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_records_options_and_middleware() {
        let swr = Swr::builder()
            .dedupe_interval(Duration::from_secs(5))
            .with_logging()
            .with_serialize_key()
            .build();

        assert_eq!(swr.config().resolve().dedupe_interval, Duration::from_secs(5));
        let names: Vec<_> = swr.config().middleware().iter().map(Middleware::name).collect();
        assert_eq!(names, ["LoggingLayer", "SerializeKeyLayer"]);
    }

    #[test]
    fn scopes_share_the_cache() {
        let swr = Swr::new();
        let nested = swr.scope(SwrConfig::new().error_retry_count(0));

        assert!(Arc::ptr_eq(swr.cache(), nested.cache()));
        assert_eq!(nested.config().resolve().error_retry_count, 0);
        assert_eq!(swr.config().resolve().error_retry_count, 3);
    }

    #[test]
    fn mutate_and_invalidate() {
        let swr = Swr::new();
        let key = Key::from("/a");

        assert!(swr.mutate(&key, Bytes::from("1")));
        assert_eq!(swr.cache().len(), 1);
        assert!(!swr.mutate(&Key::null(), Bytes::new()));

        assert!(swr.invalidate(&key));
        assert!(!swr.invalidate(&key));
        assert!(swr.cache().is_empty());
    }

    #[test]
    fn builder_accepts_an_existing_cache() {
        let cache = Arc::new(Cache::new());
        let swr = Swr::builder().cache(Arc::clone(&cache)).build();
        assert!(Arc::ptr_eq(swr.cache(), &cache));
    }
}
