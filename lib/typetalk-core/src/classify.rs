//! Response classification.
//!
//! Typetalk reports OAuth2 failures on 400/401 responses through the
//! `WWW-Authenticate` challenge header, e.g.
//! `Bearer error="invalid_token", error_description="The access token expired"`.

use tracing::debug;
use url::Url;

use crate::{ApiError, Error, Method, Response, Result};

/// Name of the challenge header.
pub const WWW_AUTHENTICATE: &str = "WWW-Authenticate";

/// Error fields carried by a `WWW-Authenticate` challenge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Challenge {
    /// Value of the `error` parameter.
    pub error: String,
    /// Value of the `error_description` parameter.
    pub error_description: String,
}

/// Parse the error parameters of a `WWW-Authenticate` header value.
///
/// The value is split on `,` and each segment on its first `=`. The key is
/// the last whitespace-separated word before `=`, which drops a leading auth
/// scheme such as `Bearer`. Values lose surrounding whitespace and double
/// quotes. Only `error_description` and `error` are recognized; when one
/// appears several times the last one wins.
///
/// # Example
///
/// ```
/// use typetalk_core::parse_challenge;
///
/// let challenge = parse_challenge(r#"Bearer error="invalid_scope""#);
/// assert_eq!(challenge.error, "invalid_scope");
/// assert!(challenge.error_description.is_empty());
/// ```
#[must_use]
pub fn parse_challenge(header: &str) -> Challenge {
    let mut challenge = Challenge::default();

    for segment in header.split(',') {
        let Some((key, value)) = segment.split_once('=') else {
            continue;
        };
        let key = key.split_whitespace().last().unwrap_or_default();
        let value = value.trim().trim_matches('"');

        match key {
            "error_description" => value.clone_into(&mut challenge.error_description),
            "error" => value.clone_into(&mut challenge.error),
            _ => {}
        }
    }

    challenge
}

/// Classify a completed response.
///
/// 2xx responses succeed. Anything else becomes [`Error::Api`] carrying the
/// status, the method and the sanitized URL; 400 and 401 responses also get
/// the error type and description from their `WWW-Authenticate` header.
/// The body is left untouched.
///
/// # Errors
///
/// Returns [`Error::Api`] for every non-2xx status.
pub fn check_response<B>(method: Method, url: &Url, response: &Response<B>) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }

    let status = response.status();
    let mut error = ApiError::new(method, url, status);

    if matches!(status, 400 | 401)
        && let Some(header) = response.header(WWW_AUTHENTICATE).filter(|h| !h.is_empty())
    {
        let challenge = parse_challenge(header);
        error = error.with_challenge(challenge.error, challenge.error_description);
    }

    debug!(
        %method,
        url = %error.url,
        status,
        error_type = %error.error_type,
        "API returned an error response"
    );

    Err(Error::Api(error))
}
