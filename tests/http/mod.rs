//! HTTP test utilities for confirmation service integration tests.
//!
//! Provides a test app builder that mirrors the production router setup
//! while allowing the backing store to be swapped out.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};

use confirmation_service::{
    app::{build_router, AppState},
    settings::Settings,
    storage::ImageStore,
    test_support::stores,
    validation::JsonValidator,
};

/// Builder for creating test routers with a configurable store.
pub struct TestAppBuilder {
    settings: Settings,
    store: Arc<dyn ImageStore>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppBuilder {
    /// Create a new test app builder backed by an in-memory encrypted store.
    pub fn new() -> Self {
        Self {
            settings: Settings::for_tests(),
            store: stores::memory_store(),
        }
    }

    /// Swap the backing store, e.g. for a failure-injecting one.
    pub fn with_store(mut self, store: Arc<dyn ImageStore>) -> Self {
        self.store = store;
        self
    }

    /// Build the test router.
    pub fn build(self) -> Router {
        let state = Arc::new(AppState {
            validator: JsonValidator::new(),
            store: self.store,
        });
        build_router(&self.settings, state)
    }
}

/// Create a test router backed by an in-memory store.
pub fn test_app() -> Router {
    TestAppBuilder::new().build()
}

/// Create a test router backed by a specific store.
pub fn test_app_with_store(store: Arc<dyn ImageStore>) -> Router {
    TestAppBuilder::new().with_store(store).build()
}

/// Build a POST request with a JSON string body.
pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_json_body(response: Response) -> serde_json::Value {
    use http_body_util::BodyExt;

    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Helper to read the response body as a plain string.
pub async fn body_string(response: Response) -> String {
    use http_body_util::BodyExt;

    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&body).to_string()
}

/// Helper to get response status and body as string (for debugging).
pub async fn response_debug(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let text = body_string(response).await;
    (status, text)
}
