//! Credential redaction for URLs that end up in errors or logs.

use url::{Url, form_urlencoded};

/// Query parameter carrying the Typetalk API token.
pub const TOKEN_PARAM: &str = "typetalkToken";

/// Replacement value for a redacted token.
pub const REDACTED: &str = "REDACTED";

/// Redact the `typetalkToken` query parameter of a URL.
///
/// Every `typetalkToken` pair with a non-empty value gets [`REDACTED`] as its
/// value. Only those pairs are rewritten: every other query segment is kept
/// byte-for-byte, in order. A URL that carries no token (or only redacted
/// ones) is returned unchanged.
///
/// # Example
///
/// ```
/// use typetalk_core::sanitize_url;
/// use url::Url;
///
/// let url = Url::parse("https://typetalk.com/api/v1/topics?typetalkToken=secret&a=b").unwrap();
/// assert_eq!(
///     sanitize_url(&url).as_str(),
///     "https://typetalk.com/api/v1/topics?typetalkToken=REDACTED&a=b"
/// );
/// ```
#[must_use]
pub fn sanitize_url(url: &Url) -> Url {
    let Some(query) = url.query() else {
        return url.clone();
    };

    let mut leaked = false;
    let segments: Vec<String> = query
        .split('&')
        .map(|segment| {
            let is_token = form_urlencoded::parse(segment.as_bytes())
                .next()
                .is_some_and(|(key, value)| {
                    key == TOKEN_PARAM && !value.is_empty() && value != REDACTED
                });
            if !is_token {
                return segment.to_string();
            }
            leaked = true;
            let raw_key = segment.split_once('=').map_or(segment, |(key, _)| key);
            format!("{raw_key}={REDACTED}")
        })
        .collect();

    if !leaked {
        return url.clone();
    }

    let mut sanitized = url.clone();
    sanitized.set_query(Some(&segments.join("&")));
    sanitized
}
