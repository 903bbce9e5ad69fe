//! Hook middleware and their composition.
//!
//! A [`Middleware`] takes the next hook implementation and returns a
//! replacement for it. [`compose`] folds an ordered list of middleware around
//! a terminal hook: the first middleware is the outermost wrapper, the
//! terminal hook the innermost call.
//!
//! ```text
//! use: [a, b, c]
//!
//!   call ──► a ──► b ──► c ──► terminal
//!   result ◄─ a ◄── b ◄── c ◄──┘
//! ```
//!
//! Middleware can be written three ways:
//!
//! - [`from_fn`] - an async function receiving the request and a [`Next`] handle
//! - [`Middleware::layer`] - any Tower [`Layer`] over [`BoxedHook`]
//! - [`Middleware::new`] - a raw `BoxedHook -> BoxedHook` function
//!
//! A middleware is free not to call the next hook at all, to rewrite the key,
//! the fetcher or the config, and to post-process the response. Errors are
//! never caught by the composition: whatever a middleware or the terminal
//! hook returns as `Err` reaches the caller unchanged.
//!
//! # Example
//!
//! ```ignore
//! use swirl::middleware::{self, Next};
//! use swirl::{HookRequest, Swr};
//!
//! let trace = middleware::from_fn(|request: HookRequest, next: Next| async move {
//!     tracing::info!(key = %request.key(), "enter");
//!     let response = next.run(request).await;
//!     tracing::info!("exit");
//!     response
//! });
//!
//! let swr = Swr::builder().with(trace).build();
//! ```
//!
//! # Available Layers
//!
//! - [`LoggingLayer`] - Logs hook calls using `tracing`
//! - [`FetchLoggerLayer`] - Replaces the fetcher with a logging wrapper
//! - [`KeepPreviousDataLayer`] - Keeps the last data while the current key has none
//! - [`SerializeKeyLayer`] - Turns structured keys into stable string keys
//! - [`MetricsLayer`] - Records hook metrics (feature `middleware-metrics`)
//! - [`ConcurrencyLimitLayer`] - Tower's concurrency limit, re-exported

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tower::util::BoxCloneService;
use tower::{Service, ServiceExt, service_fn};

use crate::{Error, HookRequest, Result, SwrResponse};

mod fetch_logger;
mod keep_previous;
mod logging;
#[cfg(feature = "middleware-metrics")]
mod metrics;
mod serialize_key;

pub use fetch_logger::{FetchLogger, FetchLoggerLayer};
pub use keep_previous::{KeepPreviousData, KeepPreviousDataLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};
#[cfg(feature = "middleware-metrics")]
pub use metrics::{Metrics, MetricsLayer};
pub use serialize_key::{SerializeKey, SerializeKeyLayer};

// Re-export tower types for convenience
pub use tower::limit::ConcurrencyLimitLayer;
pub use tower::{Layer, ServiceBuilder};

/// Type-erased hook implementation.
///
/// Every hook in a chain, the terminal one included, has this type once
/// composed.
pub type BoxedHook = BoxCloneService<HookRequest, SwrResponse, Error>;

type WrapFn = dyn Fn(BoxedHook) -> BoxedHook + Send + Sync;

/// A function from the next hook to a replacement hook.
///
/// Cloning is cheap. Applying a middleware creates a fresh wrapper each time,
/// so any state the wrapper owns belongs to one composed hook only.
#[derive(Clone)]
pub struct Middleware {
    name: Arc<str>,
    wrap: Arc<WrapFn>,
}

impl Middleware {
    /// Create a middleware from a raw wrapping function.
    pub fn new<F>(wrap: F) -> Self
    where
        F: Fn(BoxedHook) -> BoxedHook + Send + Sync + 'static,
    {
        Self {
            name: Arc::from("middleware"),
            wrap: Arc::new(wrap),
        }
    }

    /// Create a middleware from a Tower layer.
    pub fn layer<L>(layer: L) -> Self
    where
        L: Layer<BoxedHook> + Send + Sync + 'static,
        L::Service: Service<HookRequest, Response = SwrResponse, Error = Error>
            + Clone
            + Send
            + 'static,
        <L::Service as Service<HookRequest>>::Future: Send + 'static,
    {
        Self {
            name: Arc::from(short_type_name::<L>()),
            wrap: Arc::new(move |next: BoxedHook| BoxCloneService::new(layer.layer(next))),
        }
    }

    /// Give this middleware a name, shown in logs and `Debug` output.
    #[must_use]
    pub fn named(mut self, name: impl AsRef<str>) -> Self {
        self.name = Arc::from(name.as_ref());
        self
    }

    /// Name of this middleware.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wrap `next`, returning the replacement hook.
    #[must_use]
    pub fn apply(&self, next: BoxedHook) -> BoxedHook {
        (self.wrap)(next)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Middleware").field(&self.name).finish()
    }
}

impl Layer<BoxedHook> for Middleware {
    type Service = BoxedHook;

    fn layer(&self, inner: BoxedHook) -> Self::Service {
        self.apply(inner)
    }
}

/// Compose `middleware` around `terminal`.
///
/// `compose(&[], h)` is `h`; `compose(&[m0, rest @ ..], h)` is
/// `m0.apply(compose(rest, h))`.
#[must_use]
pub fn compose(middleware: &[Middleware], terminal: BoxedHook) -> BoxedHook {
    middleware
        .iter()
        .rev()
        .fold(terminal, |next, m| m.apply(next))
}

/// Handle on the rest of the chain, given to [`from_fn`] middleware.
#[derive(Clone)]
pub struct Next {
    inner: BoxedHook,
}

impl Next {
    /// Call the next hook.
    pub async fn run(self, request: HookRequest) -> Result<SwrResponse> {
        self.inner.oneshot(request).await
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// Create a middleware from an async function.
///
/// The function receives the request and a [`Next`] handle; it may change the
/// request, call `next.run(..)` zero or one time, and change the response.
pub fn from_fn<F, Fut>(f: F) -> Middleware
where
    F: Fn(HookRequest, Next) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<SwrResponse>> + Send + 'static,
{
    Middleware::new(move |next: BoxedHook| {
        let f = f.clone();
        BoxCloneService::new(service_fn(move |request| {
            f(
                request,
                Next {
                    inner: next.clone(),
                },
            )
        }))
    })
    .named("from_fn")
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use bytes::Bytes;

    use super::*;
    use crate::{Config, DataSource, Fetcher, Key};

    fn terminal(log: Arc<Mutex<Vec<String>>>) -> BoxedHook {
        BoxCloneService::new(service_fn(move |request: HookRequest| {
            let log = Arc::clone(&log);
            async move {
                log.lock().expect("lock").push("terminal".to_string());
                Ok::<_, Error>(SwrResponse::new(
                    request.key().clone(),
                    Bytes::from("data"),
                    DataSource::Fetched,
                ))
            }
        }))
    }

    fn tag(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> Middleware {
        from_fn(move |request, next: Next| {
            let log = Arc::clone(&log);
            async move {
                log.lock().expect("lock").push(format!("enter {name}"));
                let response = next.run(request).await;
                log.lock().expect("lock").push(format!("exit {name}"));
                response
            }
        })
    }

    fn request() -> HookRequest {
        HookRequest::new(
            "/k",
            Fetcher::new(|_key: Key| async { Ok(Bytes::new()) }),
            Config::default(),
        )
    }

    #[tokio::test]
    async fn compose_runs_first_middleware_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = [tag("a", Arc::clone(&log)), tag("b", Arc::clone(&log))];

        let hook = compose(&chain, terminal(Arc::clone(&log)));
        hook.oneshot(request()).await.expect("response");

        let log = log.lock().expect("lock").clone();
        assert_eq!(log, ["enter a", "enter b", "terminal", "exit b", "exit a"]);
    }

    #[test]
    fn layer_middleware_is_named_after_the_layer() {
        let m = Middleware::layer(LoggingLayer::new());
        assert_eq!(m.name(), "LoggingLayer");
        assert_eq!(format!("{m:?}"), r#"Middleware("LoggingLayer")"#);

        let m = m.named("log");
        assert_eq!(m.name(), "log");
    }

    #[test]
    fn short_type_name_strips_path_and_generics() {
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
        assert_eq!(short_type_name::<KeepPreviousDataLayer>(), "KeepPreviousDataLayer");
    }
}
