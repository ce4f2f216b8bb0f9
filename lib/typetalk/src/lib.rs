//! Typetalk API client support.
//!
//! Options structs derive [`Params`](macro@Params) and are encoded into a
//! query string or a form body; responses go through the shared pipeline
//! that turns non-2xx statuses into [`ApiError`] values.
//!
//! # Example
//!
//! ```ignore
//! use typetalk::prelude::*;
//!
//! #[derive(Debug, Default, Params)]
//! #[param(rename_all = "camelCase")]
//! pub struct GetMyFriendsOptions {
//!     q: String,
//!     #[param(omit_empty)]
//!     offset: u32,
//!     #[param(omit_empty)]
//!     count: u32,
//! }
//!
//! let config = ClientConfig::builder().token(token).build();
//! let request = config.prepare(Method::Get, "search/friends", &opts)?;
//! let friends: Friends = transport.call(request).await?;
//! ```

mod config;
pub mod prelude;

pub use config::{ApiVersion, ClientConfig, ClientConfigBuilder, TOKEN_HEADER};

// Re-export core types
pub use typetalk_core::{
    ApiError, Challenge, ContentType, Error, HttpClient, HttpClientExt, Method, ParamKey,
    ParamValue, Params, REDACTED, Request, RequestBuilder, Response, Result, TOKEN_PARAM,
    ToParams, WWW_AUTHENTICATE, add_queries, check_response, from_json, parse_challenge,
    sanitize_url, set_query, to_form,
};

// Re-export crates used by endpoint code
pub use bytes;
pub use url;

// Re-export macros
pub use typetalk_macro::Params;
