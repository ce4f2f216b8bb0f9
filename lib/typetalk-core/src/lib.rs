//! Core types for the Typetalk API client.
//!
//! This crate provides the pieces every Typetalk endpoint call goes through:
//! - [`Params`], [`ToParams`], [`ParamKey`], [`ParamValue`] - Options encoding
//!   into query strings and form bodies, with indexed keys for sequences
//! - [`add_queries`] and [`to_form`] - Apply encoded options to a URL or body
//! - [`check_response`] and [`parse_challenge`] - Classify responses and read
//!   the `WWW-Authenticate` challenge
//! - [`sanitize_url`] - Redact the `typetalkToken` query parameter
//! - [`Request`], [`Response`], [`Method`] - HTTP value types
//! - [`Error`], [`ApiError`] and [`Result`] - Error handling
//! - [`HttpClient`] and [`HttpClientExt`] - Transport seam and request pipeline

mod body;
mod classify;
mod client;
mod error;
mod method;
mod params;
mod request;
mod response;
mod sanitize;

pub use body::{ContentType, from_json, to_form};
pub use classify::{Challenge, WWW_AUTHENTICATE, check_response, parse_challenge};
pub use client::{HttpClient, HttpClientExt};
pub use error::{ApiError, Error, Result};
pub use method::Method;
pub use params::{ParamKey, ParamValue, Params, ToParams, add_queries, set_query};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use sanitize::{REDACTED, TOKEN_PARAM, sanitize_url};
