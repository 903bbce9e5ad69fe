//! Error types for swirl.
//!
//! Hooks and middleware share a single [`Error`] type so that a failure raised
//! anywhere in a middleware chain reaches the caller unchanged.

use derive_more::{Display, Error, From};

/// Main error type for swirl operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The fetcher failed for a reason of its own.
    ///
    /// Custom fetchers report their failures with [`Error::fetch`]; these are
    /// retried.
    #[display("fetch error for key '{key}': {message}")]
    #[from(skip)]
    Fetch {
        /// Serialized key that was being fetched.
        key: String,
        /// Error message.
        message: String,
    },

    /// HTTP-level errors (non-2xx status codes) reported by an HTTP fetcher.
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Response body, if available.
        #[error(not(source))]
        body: Option<bytes::Bytes>,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// A fetch attempt did not complete within the configured timeout.
    #[display("fetch timeout")]
    #[from(skip)]
    Timeout,

    /// The key cannot be used by the fetcher (e.g. not a URL).
    #[display("invalid key: {_0}")]
    #[from(skip)]
    InvalidKey(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Failure raised by a middleware.
    #[display("middleware error: {_0}")]
    #[from(skip)]
    Middleware(#[error(not(source))] String),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a fetch error for the given serialized key.
    #[must_use]
    pub fn fetch(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP error from status code and message.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Create an HTTP error with body.
    #[must_use]
    pub fn http_with_body(status: u16, message: impl Into<String>, body: bytes::Bytes) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: Some(body),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid key error.
    #[must_use]
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey(message.into())
    }

    /// Create a middleware error.
    #[must_use]
    pub fn middleware(message: impl Into<String>) -> Self {
        Self::Middleware(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns the HTTP status code if this is an HTTP error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns `true` if a new fetch attempt may succeed.
    ///
    /// Fetcher failures, connection errors, timeouts, 5xx and 429 are retryable.
    /// Everything else (bad keys, decoding, 4xx, middleware) is not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch { .. } | Self::Connection(_) | Self::Timeout => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns the response body if this is an HTTP error with a body.
    #[must_use]
    pub fn body(&self) -> Option<&bytes::Bytes> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Try to decode the HTTP error body as JSON.
    ///
    /// Returns `None` if there is no body or this is not an HTTP error.
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.body().map(|body| crate::from_json(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        insta::assert_snapshot!(Error::http(404, "Not Found"), @"HTTP error 404: Not Found");
        insta::assert_snapshot!(Error::Timeout, @"fetch timeout");
        insta::assert_snapshot!(
            Error::fetch("/api/user", "boom"),
            @"fetch error for key '/api/user': boom"
        );
        insta::assert_snapshot!(
            Error::middleware("rejected"),
            @"middleware error: rejected"
        );

        let err = Error::json_deserialization("user.address.city", "missing field `city`");
        assert_eq!(
            err.to_string(),
            "JSON deserialization error at 'user.address.city': missing field `city`"
        );
    }

    #[test]
    fn error_status() {
        let err = Error::http(404, "Not Found");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());

        let err = Error::http(500, "Internal Server Error");
        assert!(err.is_server_error());

        assert_eq!(Error::Timeout.status(), None);
    }

    #[test]
    fn error_is_retryable() {
        assert!(Error::Timeout.is_retryable());
        assert!(Error::connection("refused").is_retryable());
        assert!(Error::fetch("k", "boom").is_retryable());
        assert!(Error::http(503, "Unavailable").is_retryable());
        assert!(Error::http(429, "Too Many Requests").is_retryable());

        assert!(!Error::http(404, "Not Found").is_retryable());
        assert!(!Error::invalid_key("null").is_retryable());
        assert!(!Error::middleware("nope").is_retryable());
    }

    #[test]
    fn error_decode_body() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct ApiError {
            error: String,
        }

        let body = bytes::Bytes::from(r#"{"error": "not found"}"#);
        let err = Error::http_with_body(404, "Not Found", body);

        let decoded = err
            .decode_body::<ApiError>()
            .expect("should have body")
            .expect("should decode");
        assert_eq!(
            decoded,
            ApiError {
                error: "not found".to_string()
            }
        );

        assert!(Error::http(404, "Not Found").decode_body::<ApiError>().is_none());
        assert!(Error::Timeout.decode_body::<ApiError>().is_none());
    }
}
