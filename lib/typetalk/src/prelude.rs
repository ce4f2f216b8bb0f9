//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types, functions, and macros
//! for easy glob importing:
//!
//! ```ignore
//! use typetalk::prelude::*;
//! ```

pub use crate::{
    ApiError, ApiVersion, ClientConfig, Error, HttpClient, HttpClientExt, Method, Params, Request,
    Response, Result, ToParams, add_queries, sanitize_url,
};
pub use serde::{Deserialize, Serialize};
