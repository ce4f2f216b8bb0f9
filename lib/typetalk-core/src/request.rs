//! HTTP request building.
//!
//! Use [`Request::builder`] to construct requests with headers, encoded
//! options and bodies.
//!
//! # Example
//!
//! ```
//! use typetalk_core::{Method, Params, Request};
//! use bytes::Bytes;
//!
//! let mut opts = Params::new();
//! opts.push("count", "20").unwrap();
//!
//! let request = Request::<Bytes>::builder(Method::Get, "https://typetalk.com/api/v1/topics/1".parse().unwrap())
//!     .header("Accept", "application/json")
//!     .params(&opts)
//!     .unwrap()
//!     .build();
//! assert_eq!(request.url().query(), Some("count=20"));
//! ```

use std::collections::HashMap;

use bytes::Bytes;

use crate::{ContentType, Method, ToParams, set_query, to_form};

/// An HTTP request with method, URL, headers, and optional body.
#[derive(Debug, Clone)]
pub struct Request<B = Bytes> {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
    body: Option<B>,
}

impl<B> Request<B> {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder<B> {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, HashMap<String, String>, Option<B>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder<B = Bytes> {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
    body: Option<B>,
}

impl<B> RequestBuilder<B> {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Encode options into the URL query, replacing any existing query.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be encoded.
    pub fn params<T: ToParams + ?Sized>(mut self, opts: &T) -> crate::Result<Self> {
        let params = opts.to_params()?;
        set_query(&mut self.url, &params);
        Ok(self)
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request<B> {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl RequestBuilder<Bytes> {
    /// Set a form-urlencoded body from options.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be encoded.
    pub fn form<T: ToParams + ?Sized>(self, opts: &T) -> crate::Result<Self> {
        let body = to_form(opts)?;
        Ok(self
            .header("Content-Type", ContentType::FormUrlEncoded.as_str())
            .body(body))
    }
}
