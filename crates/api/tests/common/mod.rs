//! Shared helpers for API integration tests.
//!
//! Builds the real application router (same middleware and session stack
//! as production) and provides a small cookie-carrying client so a test
//! can walk the wizard across requests like a browser would.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use leadflow_api::config::ServerConfig;
use leadflow_api::router::build_app_router;
use leadflow_api::state::AppState;
use leadflow_notify::{OneSignalClient, OneSignalConfig};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
///
/// The notification client is deliberately unconfigured: sends fail fast
/// without touching the network, which also exercises the "notification
/// failure must not fail submission" contract.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        notifier: Arc::new(OneSignalClient::new(OneSignalConfig::unconfigured())),
    };
    build_app_router(state, &config)
}

/// A minimal browser stand-in: replays the session cookie across requests.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    pub fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    pub async fn get(&mut self, uri: &str) -> Response {
        let builder = Request::builder().method(Method::GET).uri(uri);
        self.send(builder, Body::empty()).await
    }

    pub async fn post_form(&mut self, uri: &str, body: &str) -> Response {
        let builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(builder, Body::from(body.to_string())).await
    }

    async fn send(&mut self, mut builder: axum::http::request::Builder, body: Body) -> Response {
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.clone());
        }
        let request = builder.body(body).expect("failed to build request");
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let value = set_cookie.to_str().expect("invalid Set-Cookie header");
            // Keep only the name=value pair, dropping attributes.
            if let Some(pair) = value.split(';').next() {
                self.cookie = Some(pair.to_string());
            }
        }

        response
    }
}

/// Decode a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is not valid JSON")
}

/// The `Location` header of a redirect response.
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .expect("invalid Location header")
}
