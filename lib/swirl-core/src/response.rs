//! Hook results.

use bytes::Bytes;

use crate::Key;

/// Where the data of a [`SwrResponse`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// No data: the key was null, or a middleware produced nothing.
    Empty,
    /// Freshly returned by the fetcher.
    Fetched,
    /// Served from the cache.
    Cache,
    /// Data of a previous key, kept while the current one has none.
    Previous,
}

/// Result of a hook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwrResponse {
    key: Key,
    data: Option<Bytes>,
    source: DataSource,
}

impl SwrResponse {
    /// Create a response carrying data.
    #[must_use]
    pub fn new(key: Key, data: Bytes, source: DataSource) -> Self {
        Self {
            key,
            data: Some(data),
            source,
        }
    }

    /// Create a response without data.
    #[must_use]
    pub fn empty(key: Key) -> Self {
        Self {
            key,
            data: None,
            source: DataSource::Empty,
        }
    }

    /// Key the response belongs to.
    #[must_use]
    pub const fn key(&self) -> &Key {
        &self.key
    }

    /// Raw data, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }

    /// Origin of the data.
    #[must_use]
    pub const fn source(&self) -> DataSource {
        self.source
    }

    /// Data belongs to a previous key.
    #[must_use]
    pub fn is_lagging(&self) -> bool {
        self.source == DataSource::Previous
    }

    /// Consume into the data.
    #[must_use]
    pub fn into_data(self) -> Option<Bytes> {
        self.data
    }

    /// Replace the data, keeping the key.
    #[must_use]
    pub fn with_data(self, data: Bytes, source: DataSource) -> Self {
        Self::new(self.key, data, source)
    }

    /// Deserialize the data as JSON.
    ///
    /// Returns `Ok(None)` when there is no data.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> crate::Result<Option<T>> {
        self.data.as_deref().map(crate::from_json::<T>).transpose()
    }

    /// Get the data as text.
    ///
    /// Returns `Ok(None)` when there is no data.
    pub fn text(&self) -> Result<Option<String>, std::string::FromUtf8Error> {
        self.data
            .as_ref()
            .map(|data| String::from_utf8(data.to_vec()))
            .transpose()
    }
}
