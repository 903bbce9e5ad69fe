//! "Laggy" middleware: keep showing the previous data.
//!
//! When a call produces no data (typically because the key went null while
//! the next one is not known yet), the data of the last successful call is
//! returned instead, marked [`DataSource::Previous`].
//!
//! The remembered data lives in a slot created when the layer is applied, so
//! two hooks composed from the same middleware list never see each other's
//! data.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::debug;

use crate::{DataSource, Error, HookRequest, Result, SwrResponse};

/// Layer that keeps the previous data around.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepPreviousDataLayer {
    _private: (),
}

impl KeepPreviousDataLayer {
    /// Create a new keep-previous-data layer.
    #[must_use]
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl<S> Layer<S> for KeepPreviousDataLayer {
    type Service = KeepPreviousData<S>;

    fn layer(&self, inner: S) -> Self::Service {
        KeepPreviousData::new(inner)
    }
}

/// Hook wrapper holding the last data it returned.
///
/// Clones share the slot: they are the same hook instance.
#[derive(Debug, Clone)]
pub struct KeepPreviousData<S> {
    inner: S,
    previous: Arc<Mutex<Option<Bytes>>>,
}

impl<S> KeepPreviousData<S> {
    /// Create a new hook wrapper with an empty slot.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            previous: Arc::new(Mutex::new(None)),
        }
    }

    /// Forget the remembered data.
    pub fn reset(&self) {
        *self
            .previous
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<S> Service<HookRequest> for KeepPreviousData<S>
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
        let previous = Arc::clone(&self.previous);

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move {
            let response = inner.call(request).await?;
            let mut slot = previous.lock().unwrap_or_else(PoisonError::into_inner);

            if let Some(data) = response.data() {
                *slot = Some(data.clone());
                return Ok(response);
            }

            match slot.as_ref() {
                Some(data) => {
                    debug!(key = %response.key(), "serving previous data");
                    Ok(response.with_data(data.clone(), DataSource::Previous))
                }
                None => Ok(response),
            }
        })
    }
}
