//! Hook invocation arguments.

use crate::{Config, Fetcher, Key};

/// The `(key, fetcher, config)` triple a hook is invoked with.
///
/// Middleware may replace any of the three before calling the next hook.
#[derive(Debug, Clone)]
pub struct HookRequest {
    key: Key,
    fetcher: Fetcher,
    config: Config,
}

impl HookRequest {
    /// Create a new request.
    #[must_use]
    pub fn new(key: impl Into<Key>, fetcher: Fetcher, config: Config) -> Self {
        Self {
            key: key.into(),
            fetcher,
            config,
        }
    }

    /// Key to resolve.
    #[must_use]
    pub const fn key(&self) -> &Key {
        &self.key
    }

    /// Mutable access to the key.
    #[must_use]
    pub fn key_mut(&mut self) -> &mut Key {
        &mut self.key
    }

    /// Fetch function.
    #[must_use]
    pub const fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Mutable access to the fetcher.
    #[must_use]
    pub fn fetcher_mut(&mut self) -> &mut Fetcher {
        &mut self.fetcher
    }

    /// Per-call configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the configuration.
    #[must_use]
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Replace the key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.key = key.into();
        self
    }

    /// Replace the fetcher.
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Fetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Consume into (key, fetcher, config).
    #[must_use]
    pub fn into_parts(self) -> (Key, Fetcher, Config) {
        (self.key, self.fetcher, self.config)
    }

    /// Rebuild from parts.
    #[must_use]
    pub fn from_parts(key: Key, fetcher: Fetcher, config: Config) -> Self {
        Self {
            key,
            fetcher,
            config,
        }
    }
}
