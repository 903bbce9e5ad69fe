//! Metrics middleware using the metrics crate facade.
//!
//! Records hook call metrics through the `metrics` crate, so any recorder
//! (Prometheus, `StatsD`, ...) installed by the application picks them up.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};

use crate::{DataSource, Error, HookRequest, Result, SwrResponse};

/// Labels used for metrics.
const LABEL_SOURCE: &str = "source";

/// Metric names.
const METRIC_CALLS_TOTAL: &str = "swr_hook_calls_total";
const METRIC_CALL_DURATION: &str = "swr_hook_call_duration_seconds";
const METRIC_CALLS_IN_FLIGHT: &str = "swr_hook_calls_in_flight";

/// Layer that records hook metrics.
///
/// Records the following metrics:
/// - `swr_hook_calls_total` (counter): calls, labeled by data source (or `error`)
/// - `swr_hook_call_duration_seconds` (histogram): call duration in seconds
/// - `swr_hook_calls_in_flight` (gauge): calls currently running
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsLayer {
    _private: (),
}

impl MetricsLayer {
    /// Create a new metrics layer.
    #[must_use]
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl<S> Layer<S> for MetricsLayer {
    type Service = Metrics<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Metrics { inner }
    }
}

/// Hook wrapper that records metrics.
#[derive(Debug, Clone)]
pub struct Metrics<S> {
    inner: S,
}

impl<S> Metrics<S> {
    /// Create a new metrics wrapper around the given hook.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

const fn source_label(source: DataSource) -> &'static str {
    match source {
        DataSource::Empty => "empty",
        DataSource::Fetched => "fetched",
        DataSource::Cache => "cache",
        DataSource::Previous => "previous",
    }
}

impl<S> Service<HookRequest> for Metrics<S>
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
        let start = Instant::now();
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        metrics::gauge!(METRIC_CALLS_IN_FLIGHT).increment(1.0);

        Box::pin(async move {
            let result = inner.call(request).await;

            metrics::gauge!(METRIC_CALLS_IN_FLIGHT).decrement(1.0);
            metrics::histogram!(METRIC_CALL_DURATION).record(start.elapsed().as_secs_f64());

            let source = match &result {
                Ok(response) => source_label(response.source()),
                Err(_) => "error",
            };
            metrics::counter!(METRIC_CALLS_TOTAL, LABEL_SOURCE => source).increment(1);

            result
        })
    }
}
