//! Common test utilities and helpers
//!
//! - `TestApp`: the full router over the in-memory store, driven with
//!   `tower::ServiceExt::oneshot`
//! - `TestDatabase`: Postgres fixture for the ignored database suite

#![allow(dead_code)]

pub mod database;

use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, Request, StatusCode,
    },
    Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use tower::ServiceExt;

use conduit::backend::auth::TokenIssuer;
use conduit::backend::cache::Cache;
use conduit::backend::db::Repositories;
use conduit::backend::routes::create_router;
use conduit::backend::server::AppState;

pub use database::TestDatabase;

/// bcrypt cost for tests; the minimum bcrypt accepts
pub const TEST_HASH_COST: u32 = 4;

pub const TEST_JWT_SECRET: &str = "test-secret";

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// First message of a Conduit error envelope
    pub fn error_message(&self) -> &str {
        self.body["errors"]["body"][0].as_str().unwrap_or_default()
    }
}

/// The application router over a fresh in-memory store
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_repositories(Repositories::in_memory())
    }

    pub fn with_repositories(repos: Repositories) -> Self {
        let tokens = TokenIssuer::new(TEST_JWT_SECRET, Duration::hours(1));
        let state = AppState::new(repos, Cache::disabled(), tokens, TEST_HASH_COST);
        Self {
            router: create_router(state),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Token {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");
        self.send(request).await
    }

    /// GET with a raw `Authorization` header value
    pub async fn get_with_authorization(&self, uri: &str, authorization: &str) -> TestResponse {
        let request = Request::builder()
            .uri(uri)
            .header(AUTHORIZATION, authorization)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Register `username` (email `<username>@conduit.io`) and return its token
    pub async fn register(&self, username: &str) -> String {
        let response = self
            .post(
                "/api/users",
                None,
                json!({
                    "user": {
                        "username": username,
                        "email": format!("{}@conduit.io", username),
                        "password": "password123"
                    }
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["user"]["token"]
            .as_str()
            .expect("token in registration response")
            .to_string()
    }

    /// Create an article as the token holder and return its slug
    pub async fn create_article(&self, token: &str, title: &str, tags: &[&str]) -> String {
        let response = self
            .post(
                "/api/articles",
                Some(token),
                json!({
                    "article": {
                        "title": title,
                        "description": format!("about {}", title),
                        "body": format!("{} body", title),
                        "tagList": tags
                    }
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["article"]["slug"]
            .as_str()
            .expect("slug in article response")
            .to_string()
    }
}
