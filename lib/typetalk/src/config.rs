//! Client configuration types.

use bytes::Bytes;
use derive_more::Display;
use tracing::debug;
use typetalk_core::{ContentType, Method, REDACTED, Request, RequestBuilder, Result, ToParams};
use url::Url;

/// Header carrying the API token.
pub const TOKEN_HEADER: &str = "X-Typetalk-Token";

/// Typetalk API version, the `{version}` segment of the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum ApiVersion {
    /// `v1`
    #[default]
    #[display("v1")]
    V1,
    /// `v2`
    #[display("v2")]
    V2,
    /// `v3`
    #[display("v3")]
    V3,
    /// `v4`
    #[display("v4")]
    V4,
    /// `v5`
    #[display("v5")]
    V5,
}

impl ApiVersion {
    /// The default base URL for this version.
    #[must_use]
    pub fn base_url(self) -> String {
        format!("https://typetalk.com/api/{self}/")
    }
}

/// Immutable configuration shared by every call.
///
/// Build it once; use [`ClientConfig::with_token`] for per-call overrides.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API version.
    pub api_version: ApiVersion,
    /// Base URL that endpoint paths are resolved against.
    ///
    /// A missing trailing `/` is added when resolving, so the last segment
    /// (usually the API version) is kept.
    pub base_url: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// API token sent in [`TOKEN_HEADER`].
    pub token: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("token", &self.token.as_ref().map(|_| REDACTED))
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let api_version = ApiVersion::default();
        Self {
            api_version,
            base_url: api_version.base_url(),
            user_agent: default_user_agent(),
            token: None,
        }
    }
}

fn default_user_agent() -> String {
    format!("typetalk-rs/{}", env!("CARGO_PKG_VERSION"))
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// A copy of this configuration using another token.
    #[must_use]
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self.clone()
        }
    }

    /// Resolve an endpoint path against the base URL.
    ///
    /// A leading `/` on `path` is ignored and a missing trailing `/` on the
    /// base is added, so `"/topics"` always stays below the versioned prefix.
    ///
    /// # Errors
    ///
    /// Returns [`typetalk_core::Error::InvalidUrl`] if the base URL does not
    /// parse.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = Url::parse(&self.base_url)?;
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }

    /// Start a request to `path` carrying the `User-Agent`, `Accept` and
    /// token headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL cannot be built.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder<Bytes>> {
        let url = self.endpoint(path)?;
        let mut builder = Request::builder(method, url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", ContentType::Json.as_str());
        if let Some(token) = &self.token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        Ok(builder)
    }

    /// Build a request with encoded options.
    ///
    /// `POST`/`PUT` options become a form body, `GET`/`DELETE` options the
    /// query string.
    pub fn prepare<T: ToParams + ?Sized>(
        &self,
        method: Method,
        path: &str,
        opts: &T,
    ) -> Result<Request<Bytes>> {
        let builder = self.request(method, path)?;
        let builder = if method.sends_form() {
            builder.form(opts)?
        } else {
            builder.params(opts)?
        };
        let request = builder.build();
        debug!(%method, path, "prepared request");
        Ok(request)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    api_version: Option<ApiVersion>,
    base_url: Option<String>,
    user_agent: Option<String>,
    token: Option<String>,
}

impl ClientConfigBuilder {
    /// Set the API version.
    ///
    /// Also selects the default base URL unless one is set explicitly.
    #[must_use]
    pub const fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Set the base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the API token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let api_version = self.api_version.unwrap_or_default();
        ClientConfig {
            api_version,
            base_url: self.base_url.unwrap_or_else(|| api_version.base_url()),
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
            token: self.token,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use typetalk_core::Params;

    use super::*;

    #[test]
    fn default_config() {
        let config = ClientConfig::default();
        check!(config.api_version == ApiVersion::V1);
        check!(config.base_url == "https://typetalk.com/api/v1/");
        check!(config.user_agent.starts_with("typetalk-rs/"));
        check!(config.token.is_none());
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::builder()
            .api_version(ApiVersion::V2)
            .user_agent("my-bot/1.0")
            .token("secret")
            .build();

        check!(config.base_url == "https://typetalk.com/api/v2/");
        check!(config.user_agent == "my-bot/1.0");
        check!(config.token.as_deref() == Some("secret"));
    }

    #[test]
    fn explicit_base_url_wins() {
        let config = ClientConfig::builder()
            .api_version(ApiVersion::V3)
            .base_url("http://localhost:8080/api/v1/")
            .build();

        check!(config.base_url == "http://localhost:8080/api/v1/");
        check!(config.api_version == ApiVersion::V3);

        let_assert!(Ok(url) = config.endpoint("topics"));
        check!(url.as_str() == "http://localhost:8080/api/v1/topics");
    }

    #[test]
    fn base_url_without_trailing_slash_keeps_version() {
        let config = ClientConfig::builder()
            .base_url("http://localhost:8080/api/v1")
            .build();

        let_assert!(Ok(url) = config.endpoint("topics"));
        check!(url.as_str() == "http://localhost:8080/api/v1/topics");

        let_assert!(Ok(url) = config.endpoint("/topics/1"));
        check!(url.as_str() == "http://localhost:8080/api/v1/topics/1");
    }

    #[test]
    fn invalid_base_url_is_reported_per_request() {
        let config = ClientConfig::builder().base_url("not a url").build();

        let_assert!(Err(err) = config.request(Method::Get, "profile"));
        check!(matches!(err, typetalk_core::Error::InvalidUrl(_)));
    }

    #[test]
    fn with_token_leaves_original_untouched() {
        let config = ClientConfig::default();
        let authed = config.with_token("secret");

        check!(config.token.is_none());
        check!(authed.token.as_deref() == Some("secret"));
        check!(authed.base_url == config.base_url);
    }

    #[test]
    fn debug_redacts_token() {
        let config = ClientConfig::default().with_token("secret");
        let debug = format!("{config:?}");

        check!(!debug.contains("secret"));
        check!(debug.contains(REDACTED));
    }

    #[test]
    fn endpoint_stays_below_version_prefix() {
        let config = ClientConfig::default();

        let_assert!(Ok(url) = config.endpoint("/topics/1"));
        check!(url.as_str() == "https://typetalk.com/api/v1/topics/1");

        let_assert!(Ok(url) = config.endpoint("spaces"));
        check!(url.as_str() == "https://typetalk.com/api/v1/spaces");
    }

    #[test]
    fn request_sets_headers() {
        let config = ClientConfig::builder()
            .user_agent("my-bot/1.0")
            .token("secret")
            .build();

        let_assert!(Ok(builder) = config.request(Method::Get, "profile"));
        let request = builder.build();

        check!(request.header("User-Agent") == Some("my-bot/1.0"));
        check!(request.header("Accept") == Some("application/json"));
        check!(request.header(TOKEN_HEADER) == Some("secret"));
    }

    #[test]
    fn request_without_token_has_no_token_header() {
        let config = ClientConfig::default();
        let_assert!(Ok(builder) = config.request(Method::Get, "profile"));

        check!(builder.build().header(TOKEN_HEADER).is_none());
    }

    #[test]
    fn prepare_get_uses_query() {
        let config = ClientConfig::default();
        let params = Params::parse("q=test&count=2");

        let_assert!(Ok(request) = config.prepare(Method::Get, "search/messages", &params));
        check!(request.url().query() == Some("q=test&count=2"));
        check!(request.body().is_none());
    }

    #[test]
    fn prepare_post_uses_form_body() {
        let config = ClientConfig::default();
        let params = Params::parse("message=hello+world");

        let_assert!(Ok(request) = config.prepare(Method::Post, "topics/1", &params));
        check!(request.url().query().is_none());
        check!(request.header("Content-Type") == Some(ContentType::FormUrlEncoded.as_str()));
        let_assert!(Some(body) = request.body());
        check!(body.as_ref() == b"message=hello+world");
    }
}
