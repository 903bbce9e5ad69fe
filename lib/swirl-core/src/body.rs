//! JSON encoding helpers for fetched data.

use bytes::Bytes;

use crate::Result;

/// Serialize a value to JSON bytes.
///
/// Handy for fetchers and for seeding the cache with `mutate`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

/// Deserialize JSON bytes into a value.
///
/// Errors carry the JSON path to the offending field.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct User {
        name: String,
        age: u32,
    }

    #[test]
    fn to_json_then_from_json() {
        let user = User {
            name: "Alice".to_string(),
            age: 30,
        };
        let bytes = to_json(&user).expect("serialize");
        check!(bytes == Bytes::from(r#"{"name":"Alice","age":30}"#));

        let back: User = from_json(&bytes).expect("deserialize");
        check!(back == user);
    }

    #[test]
    fn from_json_missing_field_error_with_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Address {
            #[allow(dead_code)]
            city: String,
        }

        #[derive(Debug, serde::Deserialize)]
        struct Profile {
            #[allow(dead_code)]
            address: Address,
        }

        let result: Result<Profile> = from_json(br#"{"address":{}}"#);
        let err = result.expect_err("should fail");
        let msg = err.to_string();
        check!(msg.contains("address"), "Expected path 'address' in error: {msg}");
        check!(msg.contains("city"));
    }
}
