//! HTTP method types.

use derive_more::Display;

/// HTTP method used by Typetalk endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Method {
    /// GET - options travel in the query string.
    #[display("GET")]
    Get,
    /// POST - options travel in a form body.
    #[display("POST")]
    Post,
    /// PUT - options travel in a form body.
    #[display("PUT")]
    Put,
    /// DELETE - options travel in the query string.
    #[display("DELETE")]
    Delete,
}

impl Method {
    /// Returns `true` if options for this method are sent as a form body
    /// rather than as query parameters.
    #[must_use]
    pub const fn sends_form(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
        }
    }
}

impl TryFrom<http::Method> for Method {
    type Error = crate::Error;

    fn try_from(method: http::Method) -> Result<Self, Self::Error> {
        match method {
            http::Method::GET => Ok(Self::Get),
            http::Method::POST => Ok(Self::Post),
            http::Method::PUT => Ok(Self::Put),
            http::Method::DELETE => Ok(Self::Delete),
            other => Err(crate::Error::invalid_request(format!(
                "unsupported HTTP method: {other}"
            ))),
        }
    }
}
