//! HTTP client traits.
//!
//! - [`HttpClient`] - Low-level HTTP execution, implemented by a transport
//! - [`HttpClientExt`] - The request pipeline shared by every endpoint:
//!   send, classify the response, decode the JSON body
//!
//! Implement [`HttpClient`] for any transport (or an in-memory fake in tests);
//! the pipeline comes for free.

use std::future::Future;
use std::time::Instant;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{Request, Response, Result, check_response, sanitize_url};

/// Core HTTP client trait.
///
/// Implementations deliver a request and buffer the response. They must
/// not interpret the status code, and should build transport failures with
/// [`crate::Error::transport`] so the token never reaches the message.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be delivered.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

/// Extension trait for [`HttpClient`] running the classify/decode pipeline.
pub trait HttpClientExt: HttpClient {
    /// Execute a request and classify its response.
    ///
    /// Logs the request inside an `http_request` span carrying the method
    /// and the sanitized URL.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or [`crate::Error::Api`] for a non-2xx
    /// response.
    fn send(&self, request: Request<Bytes>) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        let method = request.method();
        let url = request.url().clone();
        let span = info_span!("http_request", %method, url = %sanitize_url(&url));

        async move {
            let start = Instant::now();
            debug!(
                headers = ?request.headers().keys().collect::<Vec<_>>(),
                has_body = request.body().is_some(),
                "sending request"
            );

            let result = self.execute(request).await;

            // Saturating conversion to u64
            let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            let response = match result {
                Ok(response) => response,
                Err(err) => {
                    warn!(error = %err, elapsed_ms, "request failed");
                    return Err(err);
                }
            };

            let status = response.status();
            if let Err(err) = check_response(method, &url, &response) {
                warn!(status, elapsed_ms, "request failed with API error");
                return Err(err);
            }

            info!(status, elapsed_ms, "request completed");
            Ok(response)
        }
        .instrument(span)
    }

    /// Execute a request, classify the response and decode its JSON body.
    ///
    /// An empty body decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns the [`HttpClientExt::send`] errors, or a JSON
    /// deserialization error.
    fn call<T: DeserializeOwned + Send>(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<T>> + Send {
        async move { self.send(request).await?.json() }
    }
}

// Blanket implementation for all HttpClient implementors
impl<T: HttpClient> HttpClientExt for T {}
