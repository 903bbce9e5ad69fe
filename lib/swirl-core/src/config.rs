//! Resolved hook configuration.

use std::time::Duration;

/// Options read by the terminal hook on every call.
///
/// Middleware receive the config as part of the [`HookRequest`](crate::HookRequest)
/// and may rewrite it before passing the call on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Cached data younger than this is returned without fetching.
    pub dedupe_interval: Duration,
    /// Number of retries after a retryable fetch error.
    pub error_retry_count: u32,
    /// Delay between two fetch attempts.
    pub error_retry_interval: Duration,
    /// Upper bound for a single fetch attempt.
    pub fetch_timeout: Option<Duration>,
    /// Whether stale cached data triggers a new fetch.
    pub revalidate_if_stale: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dedupe_interval: Duration::from_secs(2),
            error_retry_count: 3,
            error_retry_interval: Duration::from_secs(5),
            fetch_timeout: None,
            revalidate_if_stale: true,
        }
    }
}

impl Config {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    dedupe_interval: Option<Duration>,
    error_retry_count: Option<u32>,
    error_retry_interval: Option<Duration>,
    fetch_timeout: Option<Duration>,
    revalidate_if_stale: Option<bool>,
}

impl ConfigBuilder {
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

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        let defaults = Config::default();
        Config {
            dedupe_interval: self.dedupe_interval.unwrap_or(defaults.dedupe_interval),
            error_retry_count: self.error_retry_count.unwrap_or(defaults.error_retry_count),
            error_retry_interval: self
                .error_retry_interval
                .unwrap_or(defaults.error_retry_interval),
            fetch_timeout: self.fetch_timeout.or(defaults.fetch_timeout),
            revalidate_if_stale: self
                .revalidate_if_stale
                .unwrap_or(defaults.revalidate_if_stale),
        }
    }
}
