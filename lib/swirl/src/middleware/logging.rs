//! Hook call logging middleware.
//!
//! This middleware logs every hook call and its outcome using the `tracing` crate.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::time::Instant;
use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::{Error, HookRequest, Result, SwrResponse};

/// Layer that adds hook call logging.
///
/// # Example
///
/// ```ignore
/// use swirl::Swr;
/// use swirl::middleware::LoggingLayer;
///
/// let swr = Swr::builder().layer(LoggingLayer::debug()).build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Log level for the logging middleware.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogLevel {
    /// Log at debug level (includes the per-call config).
    Debug,
    /// Log at info level (summary only).
    #[default]
    Info,
}

impl LoggingLayer {
    /// Create a new logging layer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging layer that logs at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Hook wrapper that logs calls and results.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Logging<S> {
    /// Create a new logging hook wrapping the given hook.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            level: LogLevel::Info,
        }
    }
}

impl<S> Service<HookRequest> for Logging<S>
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
        let key = request.key().to_string();
        let level = self.level;

        let span = span!(Level::INFO, "swr_hook", %key);

        // The ready service handles this call; the clone waits for the next one.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(
            async move {
                let start = Instant::now();

                match level {
                    LogLevel::Debug => {
                        debug!(key = %key, config = ?request.config(), "hook called");
                    }
                    LogLevel::Info => {
                        info!(key = %key, "hook called");
                    }
                }

                let result = inner.call(request).await;

                // Saturating conversion to u64
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) => {
                        let source = response.source();
                        info!(?source, elapsed_ms, "hook completed");
                    }
                    Err(err) => {
                        warn!(error = %err, elapsed_ms, "hook failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}
