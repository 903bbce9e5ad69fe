//! Cache keys.
//!
//! A [`Key`] identifies a piece of remote data. It is any JSON value: a string
//! URL, a tuple of arguments, an object. The null key disables fetching.

use std::fmt;

use serde_json::Value;

/// Marks the serialized form of a non-string key.
const STRUCTURED_PREFIX: char = '@';

/// Identity of a piece of remote data.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Key(Value);

impl Key {
    /// The null key: hooks called with it do not fetch.
    #[must_use]
    pub const fn null() -> Self {
        Self(Value::Null)
    }

    /// Build a tuple key from its parts.
    #[must_use]
    pub fn array<I, V>(parts: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self(Value::Array(parts.into_iter().map(Into::into).collect()))
    }

    /// Returns `true` for the null key.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// The string form, if this key is a plain string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// The underlying JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume into the underlying JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Stable serialized form used as cache identity.
    ///
    /// Strings serialize to themselves. Every other value serializes to `@`
    /// followed by its compact JSON, object fields in sorted order, so the
    /// array `["/a",1]` and the string `"[\"/a\",1]"` stay distinct. A string
    /// starting with `@` is therefore the serialized form of a structured key.
    /// The null key has no identity.
    #[must_use]
    pub fn serialize(&self) -> Option<String> {
        match &self.0 {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(format!("{STRUCTURED_PREFIX}{other}")),
        }
    }

    /// Parse the output of [`Key::serialize`] back into a key.
    ///
    /// # Errors
    ///
    /// Returns an error if a `@`-prefixed string is not valid JSON.
    pub fn from_serialized(serialized: &str) -> serde_json::Result<Self> {
        match serialized.strip_prefix(STRUCTURED_PREFIX) {
            Some(json) => serde_json::from_str(json).map(Self),
            None => Ok(Self::from(serialized)),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.serialize() {
            Some(s) => f.write_str(&s),
            None => f.write_str("<null>"),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self(Value::String(value))
    }
}

impl From<Value> for Key {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl<T: Into<Key>> From<Option<T>> for Key {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::null, Into::into)
    }
}
