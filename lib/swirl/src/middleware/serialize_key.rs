//! Key serialization middleware.
//!
//! Structured keys (arrays, objects, numbers) are replaced by their stable
//! `@`-prefixed string form before reaching the next hook, so equal structures
//! share one cache entry and never collide with plain string keys.
//! The fetcher is wrapped to parse the string back, and thus still receives
//! the structured key.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::{Layer, Service};

use crate::{Error, Fetcher, HookRequest, Key, Result, SwrResponse};

/// Layer that serializes structured keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializeKeyLayer {
    _private: (),
}

impl SerializeKeyLayer {
    /// Create a new key serialization layer.
    #[must_use]
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl<S> Layer<S> for SerializeKeyLayer {
    type Service = SerializeKey<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SerializeKey { inner }
    }
}

/// Hook wrapper that serializes structured keys.
#[derive(Debug, Clone)]
pub struct SerializeKey<S> {
    inner: S,
}

impl<S> SerializeKey<S> {
    /// Create a new key serialization wrapper around the given hook.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

/// Fetcher receiving a serialized key and calling `fetcher` with the parsed one.
fn deserializing_fetcher(fetcher: Fetcher) -> Fetcher {
    fetcher.map(|key, inner| async move {
        let serialized = key
            .as_str()
            .ok_or_else(|| Error::invalid_key(format!("expected a serialized key, got {key}")))?;
        let parsed = Key::from_serialized(serialized)
            .map_err(|e| Error::invalid_key(format!("cannot parse key '{serialized}': {e}")))?;
        inner.fetch(parsed).await
    })
}

impl<S> Service<HookRequest> for SerializeKey<S>
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

    fn call(&mut self, request: HookRequest) -> Self::Future {
        let structured = !request.key().is_null() && request.key().as_str().is_none();
        let request = match request.key().serialize() {
            Some(serialized) if structured => {
                let (_key, fetcher, config) = request.into_parts();
                HookRequest::from_parts(
                    Key::from(serialized),
                    deserializing_fetcher(fetcher),
                    config,
                )
            }
            _ => request,
        };

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(request).await })
    }
}
