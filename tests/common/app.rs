//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use palette_pilot::models::AppConfig;
use palette_pilot::server::{build_router, create_app_state_with_engine, AppState};
use palette_pilot::services::PipelineHandle;

use super::fixtures::wait_for_state;
use super::stub_engine::StubEngine;
use palette_pilot::services::RequestState;

/// Test application with router and direct access to the pipeline
pub struct TestApp {
    router: axum::Router,
    pub engine: Arc<StubEngine>,
    pub pipeline: PipelineHandle,
}

impl TestApp {
    /// Create a test application backed by a healthy stub engine.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new() -> Self {
        Self::with_engine(Arc::new(StubEngine::new()))
    }

    pub fn with_engine(engine: Arc<StubEngine>) -> Self {
        let config = AppConfig::default();
        let state: AppState = create_app_state_with_engine(engine.clone(), &config);
        let pipeline = state.pipeline.clone();

        // Build router using shared server module (same as production)
        let router = build_router(state);

        Self {
            router,
            engine,
            pipeline,
        }
    }

    /// Create an app and wait for the engine and the first palette
    pub async fn ready() -> Self {
        let app = Self::new();
        app.wait_until_idle().await;
        app
    }

    /// Wait until the engine is ready and no generation is outstanding
    pub async fn wait_until_idle(&self) {
        wait_for_state(&self.pipeline, |s| {
            s.ready && !s.loading && s.request_state == RequestState::Fulfilled
        })
        .await;
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request without a body
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request(Request::post(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Make a PUT request with JSON body
    pub async fn put_json(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::put(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}
