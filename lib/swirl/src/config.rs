//! Configuration scopes.
//!
//! A [`SwrConfig`] is one scope of configuration: every option is optional,
//! and the scope may contribute middleware through its `use_` list. Scopes
//! nest: merging an inner scope into an outer one lets inner options win and
//! appends inner middleware after outer middleware.

use std::time::Duration;

use tower::{Layer, Service};

use crate::middleware::{BoxedHook, Middleware};
use crate::{Config, Error, HookRequest, SwrResponse};

/// One configuration scope.
///
/// # Example
///
/// ```ignore
/// use swirl::{SwrConfig, middleware::LoggingLayer};
/// use std::time::Duration;
///
/// let outer = SwrConfig::new().layer(LoggingLayer::new());
/// let inner = SwrConfig::new().dedupe_interval(Duration::from_secs(10));
///
/// let merged = outer.merge(&inner);
/// assert_eq!(merged.resolve().dedupe_interval, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SwrConfig {
    dedupe_interval: Option<Duration>,
    error_retry_count: Option<u32>,
    error_retry_interval: Option<Duration>,
    fetch_timeout: Option<Duration>,
    revalidate_if_stale: Option<bool>,
    use_: Vec<Middleware>,
}

impl SwrConfig {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dedupe interval.
    #[must_use]
    pub const fn dedupe_interval(mut self, interval: Duration) -> Self {
        self.dedupe_interval = Some(interval);
        self
    }

    /// Set the number of retries on error.
    #[must_use]
    pub const fn error_retry_count(mut self, count: u32) -> Self {
        self.error_retry_count = Some(count);
        self
    }

    /// Set the delay between retries.
    #[must_use]
    pub const fn error_retry_interval(mut self, interval: Duration) -> Self {
        self.error_retry_interval = Some(interval);
        self
    }

    /// Set the timeout of a single fetch attempt.
    #[must_use]
    pub const fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Set whether stale data is revalidated.
    #[must_use]
    pub const fn revalidate_if_stale(mut self, revalidate: bool) -> Self {
        self.revalidate_if_stale = Some(revalidate);
        self
    }

    /// Append a middleware to this scope's `use_` list.
    #[must_use]
    pub fn with(mut self, middleware: Middleware) -> Self {
        self.use_.push(middleware);
        self
    }

    /// Append a Tower layer to this scope's `use_` list.
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

    /// Middleware contributed by this scope, outermost first.
    #[must_use]
    pub fn middleware(&self) -> &[Middleware] {
        &self.use_
    }

    /// Merge an inner scope into this one.
    ///
    /// Options set in `inner` override ours; `inner` middleware run after ours.
    #[must_use]
    pub fn merge(&self, inner: &Self) -> Self {
        Self {
            dedupe_interval: inner.dedupe_interval.or(self.dedupe_interval),
            error_retry_count: inner.error_retry_count.or(self.error_retry_count),
            error_retry_interval: inner.error_retry_interval.or(self.error_retry_interval),
            fetch_timeout: inner.fetch_timeout.or(self.fetch_timeout),
            revalidate_if_stale: inner.revalidate_if_stale.or(self.revalidate_if_stale),
            use_: self.use_.iter().chain(&inner.use_).cloned().collect(),
        }
    }

    /// Resolve the options against defaults.
    #[must_use]
    pub fn resolve(&self) -> Config {
        let mut builder = Config::builder();
        if let Some(interval) = self.dedupe_interval {
            builder = builder.dedupe_interval(interval);
        }
        if let Some(count) = self.error_retry_count {
            builder = builder.error_retry_count(count);
        }
        if let Some(interval) = self.error_retry_interval {
            builder = builder.error_retry_interval(interval);
        }
        if let Some(timeout) = self.fetch_timeout {
            builder = builder.fetch_timeout(timeout);
        }
        if let Some(revalidate) = self.revalidate_if_stale {
            builder = builder.revalidate_if_stale(revalidate);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{KeepPreviousDataLayer, LoggingLayer, SerializeKeyLayer};

    fn names(config: &SwrConfig) -> Vec<&str> {
        config.middleware().iter().map(Middleware::name).collect()
    }

    #[test]
    fn resolve_fills_defaults() {
        let config = SwrConfig::new().error_retry_count(1).resolve();
        assert_eq!(config.error_retry_count, 1);
        assert_eq!(config, Config::builder().error_retry_count(1).build());
    }

    #[test]
    fn inner_options_win() {
        let outer = SwrConfig::new()
            .dedupe_interval(Duration::from_secs(1))
            .error_retry_count(5);
        let inner = SwrConfig::new().dedupe_interval(Duration::from_secs(9));

        let config = outer.merge(&inner).resolve();
        assert_eq!(config.dedupe_interval, Duration::from_secs(9));
        assert_eq!(config.error_retry_count, 5);
    }

    #[test]
    fn middleware_lists_concatenate_outer_first() {
        let outer = SwrConfig::new().layer(LoggingLayer::new());
        let inner = SwrConfig::new()
            .layer(SerializeKeyLayer::new())
            .layer(KeepPreviousDataLayer::new());

        let merged = outer.merge(&inner);
        assert_eq!(
            names(&merged),
            ["LoggingLayer", "SerializeKeyLayer", "KeepPreviousDataLayer"]
        );
    }

    #[test]
    fn merge_is_associative() {
        let a = SwrConfig::new().with(Middleware::layer(LoggingLayer::new()).named("a"));
        let b = SwrConfig::new().with(Middleware::layer(LoggingLayer::new()).named("b"));
        let c = SwrConfig::new().with(Middleware::layer(LoggingLayer::new()).named("c"));

        let left = a.merge(&b).merge(&c);
        let right = a.merge(&b.merge(&c));
        assert_eq!(names(&left), names(&right));
        assert_eq!(names(&left), ["a", "b", "c"]);
    }
}
