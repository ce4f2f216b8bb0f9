//! Error types for the Typetalk client.

use derive_more::{Display, Error, From};
use url::Url;

use crate::{Method, sanitize_url};

// ============================================================================
// API Error
// ============================================================================

/// A non-2xx response from the Typetalk API.
///
/// The URL is always sanitized, so rendering this error never leaks the
/// `typetalkToken` query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{method} {url}: {status} {error_type} {description}")]
pub struct ApiError {
    /// Method of the failed request.
    pub method: Method,
    /// Sanitized request URL.
    pub url: Url,
    /// HTTP status code.
    pub status: u16,
    /// OAuth2 error token from the `WWW-Authenticate` challenge (e.g. `invalid_token`).
    pub error_type: String,
    /// Human-readable description from the challenge.
    pub description: String,
}

impl ApiError {
    /// Create an API error with empty type and description.
    ///
    /// The URL is sanitized on construction.
    #[must_use]
    pub fn new(method: Method, url: &Url, status: u16) -> Self {
        Self {
            method,
            url: sanitize_url(url),
            status,
            error_type: String::new(),
            description: String::new(),
        }
    }

    /// Set the error type and description.
    #[must_use]
    pub fn with_challenge(
        mut self,
        error_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.error_type = error_type.into();
        self.description = description.into();
        self
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for Typetalk client operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The API answered with a non-2xx status.
    #[display("{_0}")]
    #[from]
    Api(#[error(not(source))] ApiError),

    /// The request could not be delivered (connection, TLS, timeout...).
    #[display("transport error for {url}: {message}")]
    #[from(skip)]
    Transport {
        /// Sanitized request URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// A parameter value has no canonical text form.
    #[display("cannot encode parameter '{key}': {message}")]
    #[from(skip)]
    Encoding {
        /// Wire key of the offending parameter.
        key: String,
        /// Error message.
        message: String,
    },

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "post.account.name").
        path: String,
        /// Error message.
        message: String,
    },

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a transport error; the URL is sanitized before it is stored.
    #[must_use]
    pub fn transport(url: &Url, message: impl Into<String>) -> Self {
        Self::Transport {
            url: sanitize_url(url).to_string(),
            message: message.into(),
        }
    }

    /// Create an encoding error for the given wire key.
    #[must_use]
    pub fn encoding(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encoding {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The API error, if this is one.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the HTTP status code if this is an API error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => Some(err.status),
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

    /// Returns `true` if the token was missing, invalid or expired.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api(err) => err.status == 401 || err.error_type == "invalid_token",
            _ => false,
        }
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
