//! Type-erased fetch functions.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::future::{BoxFuture, FutureExt};

use crate::{Key, Result};

type FetchFn = dyn Fn(Key) -> BoxFuture<'static, Result<Bytes>> + Send + Sync;

/// An async function resolving a [`Key`] into raw data.
///
/// Cloning is cheap: clones share the same function.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use swirl_core::{Fetcher, Key};
///
/// let fetcher = Fetcher::new(|key: Key| async move {
///     Ok(Bytes::from(format!("data for {key}")))
/// });
/// ```
#[derive(Clone)]
pub struct Fetcher {
    inner: Arc<FetchFn>,
}

impl Fetcher {
    /// Create a fetcher from an async function.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Key) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Bytes>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |key| f(key).boxed()),
        }
    }

    /// Fetch the data for `key`.
    pub fn fetch(&self, key: Key) -> BoxFuture<'static, Result<Bytes>> {
        (self.inner)(key)
    }

    /// Wrap this fetcher.
    ///
    /// `f` receives the key and the original fetcher, and decides how (and
    /// whether) to call it.
    #[must_use]
    pub fn map<F, Fut>(self, f: F) -> Self
    where
        F: Fn(Key, Fetcher) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Bytes>> + Send + 'static,
    {
        Self::new(move |key| f(key, self.clone()))
    }

    /// Returns `true` if both handles share the same function.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher").finish_non_exhaustive()
    }
}
