//! Integration tests for the request pipeline: prepare, send, classify, decode.

#![allow(missing_docs)]

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use assert2::{check, let_assert};
use typetalk::bytes::Bytes;
use typetalk::prelude::*;
use typetalk::{TOKEN_HEADER, WWW_AUTHENTICATE, url::Url};

/// In-memory transport returning a canned response and recording requests.
struct FakeClient {
    status: u16,
    headers: HashMap<String, String>,
    body: &'static str,
    requests: Mutex<Vec<Request<Bytes>>>,
}

impl FakeClient {
    fn new(status: u16, body: &'static str) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    fn last_request(&self) -> Request<Bytes> {
        let requests = self.requests.lock().expect("lock");
        requests.last().cloned().expect("a request was sent")
    }
}

impl HttpClient for FakeClient {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = typetalk::Result<Response<Bytes>>> + Send {
        self.requests.lock().expect("lock").push(request);
        let response = Response::new(
            self.status,
            self.headers.clone(),
            Bytes::from_static(self.body.as_bytes()),
        );
        async move { Ok(response) }
    }
}

/// Transport that never delivers.
struct OfflineClient;

impl HttpClient for OfflineClient {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = typetalk::Result<Response<Bytes>>> + Send {
        let err = Error::transport(request.url(), "connection refused");
        async move { Err(err) }
    }
}

#[derive(Debug, PartialEq, Eq, Deserialize)]
struct Account {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Profile {
    account: Account,
}

#[derive(Debug, Default, Params)]
#[param(rename_all = "camelCase")]
struct GetMyFriendsOptions {
    q: String,
    #[param(omit_empty)]
    offset: u32,
    #[param(omit_empty)]
    count: u32,
}

#[derive(Debug, Params)]
#[param(rename_all = "camelCase")]
struct PostMessageOptions {
    message: String,
    #[param(indexed)]
    file_keys: Vec<String>,
}

fn config() -> ClientConfig {
    ClientConfig::builder().token("secret-token").build()
}

#[tokio::test]
async fn test_success_decodes_json() {
    let client = FakeClient::new(200, r#"{"account":{"id":1,"name":"alice"}}"#);
    let request = config()
        .prepare(Method::Get, "profile", &GetMyFriendsOptions::default())
        .expect("prepare");

    let profile: Profile = client.call(request).await.expect("call");
    assert_eq!(
        profile.account,
        Account {
            id: 1,
            name: "alice".to_string()
        }
    );
}

#[tokio::test]
async fn test_get_options_travel_in_query() {
    let client = FakeClient::new(200, "[]");
    let opts = GetMyFriendsOptions {
        q: "test".to_string(),
        offset: 10,
        count: 2,
    };
    let request = config()
        .prepare(Method::Get, "search/friends", &opts)
        .expect("prepare");

    let _: Vec<Account> = client.call(request).await.expect("call");

    let sent = client.last_request();
    check!(sent.url().as_str() == "https://typetalk.com/api/v1/search/friends?q=test&offset=10&count=2");
    check!(sent.header(TOKEN_HEADER) == Some("secret-token"));
    check!(sent.body().is_none());
}

#[tokio::test]
async fn test_post_options_travel_in_form_body() {
    let client = FakeClient::new(200, "");
    let opts = PostMessageOptions {
        message: "hello world".to_string(),
        file_keys: vec!["k1".to_string(), "k2".to_string()],
    };
    let request = config()
        .prepare(Method::Post, "topics/1", &opts)
        .expect("prepare");

    let () = client.call(request).await.expect("empty body decodes as unit");

    let sent = client.last_request();
    check!(sent.url().query().is_none());
    let_assert!(Some(body) = sent.body());
    check!(body.as_ref() == b"message=hello+world&fileKeys%5B0%5D=k1&fileKeys%5B1%5D=k2");
}

#[tokio::test]
async fn test_bad_request_reads_challenge() {
    let client = FakeClient::new(400, r#"{"ignored":true}"#).with_header(
        WWW_AUTHENTICATE,
        r#"Bearer error="invalid_request", error_description="topicId is required""#,
    );
    let request = config()
        .request(Method::Get, "topics")
        .expect("request")
        .build();

    let_assert!(Err(err) = client.send(request).await);
    let_assert!(Some(api) = err.api_error());
    check!(api.status == 400);
    check!(api.error_type == "invalid_request");
    check!(api.description == "topicId is required");
    check!(err.is_client_error());
}

#[tokio::test]
async fn test_unauthorized_without_header() {
    let client = FakeClient::new(401, "");
    let request = config()
        .request(Method::Get, "profile")
        .expect("request")
        .build();

    let_assert!(Err(err) = client.send(request).await);
    check!(err.is_unauthorized());
    let_assert!(Some(api) = err.api_error());
    check!(api.error_type.is_empty());
    check!(api.description.is_empty());
}

#[tokio::test]
async fn test_forbidden_ignores_challenge() {
    let client = FakeClient::new(403, "")
        .with_header(WWW_AUTHENTICATE, r#"Bearer error="insufficient_scope""#);
    let request = config()
        .request(Method::Delete, "topics/1")
        .expect("request")
        .build();

    let_assert!(Err(err) = client.send(request).await);
    check!(err.status() == Some(403));
    let_assert!(Some(api) = err.api_error());
    check!(api.error_type.is_empty());
}

#[tokio::test]
async fn test_server_error() {
    let client = FakeClient::new(503, "maintenance");
    let request = config()
        .request(Method::Get, "spaces")
        .expect("request")
        .build();

    let_assert!(Err(err) = client.call::<Vec<Account>>(request).await);
    check!(err.is_server_error());
    check!(!err.is_client_error());
}

#[tokio::test]
async fn test_error_message_redacts_query_token() {
    let client = FakeClient::new(401, "").with_header(
        WWW_AUTHENTICATE,
        r#"Bearer error="invalid_token", error_description="The access token expired""#,
    );
    let url = Url::parse("https://typetalk.com/api/v1/profile?typetalkToken=secret-token&q=x")
        .expect("url");
    let request = Request::builder(Method::Get, url).build();

    let_assert!(Err(err) = client.send(request).await);
    check!(!err.to_string().contains("secret-token"));
    insta::assert_snapshot!(
        err.to_string(),
        @"GET https://typetalk.com/api/v1/profile?typetalkToken=REDACTED&q=x: 401 invalid_token The access token expired"
    );
}

#[tokio::test]
async fn test_transport_error_propagates() {
    let url = Url::parse("https://typetalk.com/api/v1/profile?typetalkToken=secret-token")
        .expect("url");
    let request = Request::builder(Method::Get, url).build();

    let_assert!(Err(err) = OfflineClient.send(request).await);
    check!(matches!(err, Error::Transport { .. }));
    check!(err.status().is_none());
    check!(!err.to_string().contains("secret-token"));
}

#[tokio::test]
async fn test_json_error_reports_path() {
    let client = FakeClient::new(200, r#"{"account":{"id":"one","name":"alice"}}"#);
    let request = config()
        .request(Method::Get, "profile")
        .expect("request")
        .build();

    let_assert!(Err(Error::JsonDeserialization { path, .. }) = client.call::<Profile>(request).await);
    check!(path == "account.id");
}
