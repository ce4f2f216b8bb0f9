//! Body serialization utilities.

use bytes::Bytes;

use crate::{Result, ToParams};

/// Content type for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Form URL-encoded content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Encode options as a form URL-encoded body.
///
/// Sequence fields expand to indexed keys (e.g. `postIds[0]=1&postIds[1]=2`).
///
/// # Errors
///
/// Returns [`crate::Error::Encoding`] if a value has no canonical form.
///
/// # Example
///
/// ```
/// use typetalk_core::{Params, to_form};
///
/// let mut params = Params::new();
/// params.push("message", "hello world").expect("push");
///
/// let bytes = to_form(&params).expect("encode");
/// assert_eq!(bytes.as_ref(), b"message=hello+world");
/// ```
pub fn to_form<T: ToParams + ?Sized>(value: &T) -> Result<Bytes> {
    let params = value.to_params()?;
    Ok(Bytes::from(params.encode().into_bytes()))
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` to provide detailed error messages that include
/// the exact path to the field that failed to deserialize. A blank body is
/// read as JSON `null`, so bodiless responses decode into `()` or `Option<T>`.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g., "post.account.name").
///
/// # Example
///
/// ```
/// use typetalk_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Topic { name: String }
///
/// let bytes = br#"{"name":"general"}"#;
/// let topic: Topic = from_json(bytes).expect("deserialize");
/// assert_eq!(topic, Topic { name: "general".to_string() });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        bytes
    };

    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Params;

    #[test]
    fn content_type_as_str() {
        assert_eq!(ContentType::Json.as_str(), "application/json");
        assert_eq!(
            ContentType::FormUrlEncoded.as_str(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(
            ContentType::FormUrlEncoded.to_string(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn to_form_encodes_pairs() {
        let mut params = Params::new();
        params.push("postIds[0]", "1").expect("push");
        params.push("postIds[1]", "2").expect("push");
        params.push("talkName", "a&b").expect("push");

        let bytes = to_form(&params).expect("encode");
        assert_eq!(
            bytes.as_ref(),
            b"postIds%5B0%5D=1&postIds%5B1%5D=2&talkName=a%26b"
        );
    }

    #[test]
    fn to_form_empty() {
        let bytes = to_form(&Params::new()).expect("encode");
        assert!(bytes.is_empty());
    }

    #[test]
    fn from_json_blank_body() {
        let value: Option<u32> = from_json(b"  \n").expect("blank");
        assert_eq!(value, None);
    }

    #[test]
    fn from_json_syntax_error() {
        let result: Result<u32> = from_json(b"not json");
        let err = result.expect_err("should fail");
        assert!(err.to_string().contains("JSON deserialization error"));
    }

    #[test]
    fn from_json_missing_field_error_with_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Account {
            #[allow(dead_code)]
            name: String,
        }

        #[derive(Debug, serde::Deserialize)]
        struct Post {
            #[allow(dead_code)]
            account: Account,
        }

        let result: Result<Post> = from_json(br#"{"account":{}}"#);
        let msg = result.expect_err("should fail").to_string();
        assert!(msg.contains("account"), "Expected path 'account' in error: {msg}");
        assert!(msg.contains("name"), "Expected field 'name' mentioned in error: {msg}");
    }
}
