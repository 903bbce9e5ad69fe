//! Composed hook instances.

use std::fmt;

use tower::ServiceExt;
use tower::util::Oneshot;

use crate::middleware::BoxedHook;
use crate::{Config, Fetcher, HookRequest, Key};

/// One component's hook: a composed middleware chain and its resolved config.
///
/// The chain is composed once, when the hook is created; middleware state
/// (e.g. [`KeepPreviousDataLayer`](crate::middleware::KeepPreviousDataLayer))
/// lives as long as the `Hook` and is never shared with another instance.
pub struct Hook {
    service: BoxedHook,
    config: Config,
}

impl Hook {
    /// Create a hook from an already composed chain.
    #[must_use]
    pub fn new(service: BoxedHook, config: Config) -> Self {
        Self { service, config }
    }

    /// Config passed to the chain on every call.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve `key` with `fetcher`.
    ///
    /// The returned future owns everything it needs; it does not borrow the hook.
    pub fn call(&self, key: impl Into<Key>, fetcher: Fetcher) -> Oneshot<BoxedHook, HookRequest> {
        self.call_with(HookRequest::new(key, fetcher, self.config.clone()))
    }

    /// Run the chain with a fully built request.
    pub fn call_with(&self, request: HookRequest) -> Oneshot<BoxedHook, HookRequest> {
        self.service.clone().oneshot(request)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
