//! HTTP fetcher using hyper-util.
//!
//! [`HttpFetcher`] turns string keys into `GET` requests: a key is either an
//! absolute URL, or a path joined onto the fetcher's base URL.
//!
//! # Example
//!
//! ```ignore
//! use swirl::{HttpFetcher, Swr};
//!
//! let http = HttpFetcher::with_base_url("https://api.example.com")?;
//! let hook = Swr::new().hook();
//!
//! let user = hook.call("/users/42", http.fetcher()).await?;
//! ```

use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tracing::debug;
use url::Url;

use crate::connector::https_connector;
use crate::{Error, Fetcher, Key, Result};

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Whole request timeout (connect, send, read body).
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_idle_per_host: usize,
    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl HttpFetcherConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> HttpFetcherConfigBuilder {
        HttpFetcherConfigBuilder::default()
    }
}

/// Builder for [`HttpFetcherConfig`].
#[derive(Debug, Clone, Default)]
pub struct HttpFetcherConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
}

impl HttpFetcherConfigBuilder {
    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> HttpFetcherConfig {
        let defaults = HttpFetcherConfig::default();
        HttpFetcherConfig {
            timeout: self.timeout.unwrap_or(defaults.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
        }
    }
}

// ============================================================================
// Fetcher
// ============================================================================

/// Fetches string keys over HTTP, with connection pooling and TLS.
#[derive(Clone)]
pub struct HttpFetcher {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    base_url: Option<Url>,
    config: HttpFetcherConfig,
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpFetcher {
    /// Create a fetcher with default configuration; keys must be absolute URLs.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HttpFetcherConfig::default())
    }

    /// Create a fetcher with custom configuration.
    #[must_use]
    pub fn with_config(config: HttpFetcherConfig) -> Self {
        let connector = https_connector(config.connect_timeout);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self {
            inner,
            base_url: None,
            config,
        }
    }

    /// Create a fetcher resolving keys against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn with_base_url(base_url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(base_url.as_ref())?;
        Ok(Self::new().base_url(url))
    }

    /// Set the base URL keys are resolved against.
    #[must_use]
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Get the fetcher configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpFetcherConfig {
        &self.config
    }

    /// Turn a key into the URL to request.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a string, or not a valid URL.
    pub fn resolve_url(&self, key: &Key) -> Result<Url> {
        let path = key
            .as_str()
            .ok_or_else(|| Error::invalid_key(format!("HTTP keys must be strings, got {key}")))?;

        let url = match &self.base_url {
            Some(base) => base.join(path)?,
            None => Url::parse(path)?,
        };
        Ok(url)
    }

    /// `GET` the URL designated by `key` and return the body.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid keys, network failures, timeouts and
    /// non-2xx responses.
    pub async fn get(&self, key: &Key) -> Result<Bytes> {
        let url = self.resolve_url(key)?;
        debug!(%url, "GET");

        let request = http::Request::builder()
            .method(http::Method::GET)
            .uri(url.as_str())
            .header(http::header::ACCEPT, "application/json")
            .body(Full::default())
            .map_err(|e| Error::invalid_key(e.to_string()))?;

        tokio::time::timeout(self.config.timeout, self.send(request))
            .await
            .map_err(|_| Error::Timeout)?
    }

    /// Send `request` and read the whole body.
    async fn send(&self, request: http::Request<Full<Bytes>>) -> Result<Bytes> {
        let response = self
            .inner
            .request(request)
            .await
            .map_err(Self::map_hyper_error)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| Error::connection(e.to_string()))?
            .to_bytes();

        if status.is_success() {
            return Ok(body);
        }

        debug!(status = status.as_u16(), ?content_type, "HTTP error");
        let message = status.canonical_reason().unwrap_or("unknown status");
        Err(Error::http_with_body(status.as_u16(), message, body))
    }

    /// Wrap this client into a [`Fetcher`].
    #[must_use]
    pub fn fetcher(&self) -> Fetcher {
        let this = self.clone();
        Fetcher::new(move |key| {
            let this = this.clone();
            async move { this.get(&key).await }
        })
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = err.to_string();

        if err.is_connect() {
            return Error::connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl From<HttpFetcher> for Fetcher {
    fn from(value: HttpFetcher) -> Self {
        value.fetcher()
    }
}
