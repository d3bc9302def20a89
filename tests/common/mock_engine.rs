//! Mock engine service for testing the HTTP engine client.

use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Wrapper around wiremock MockServer with engine-shaped endpoints
pub struct MockEngineServer {
    pub server: MockServer,
}

impl MockEngineServer {
    /// Start a new mock engine
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Base URL to hand to `HttpEngine::new`
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Mock `GET /health` with the given status
    pub async fn mock_health(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Mock a POST endpoint returning JSON
    pub async fn mock_post_json(&self, endpoint: &str, response: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .mount(&self.server)
            .await;
    }

    /// Mock a POST endpoint that only answers when the body contains `expected`
    pub async fn mock_post_matching(
        &self,
        endpoint: &str,
        expected: serde_json::Value,
        response: serde_json::Value,
    ) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .and(body_partial_json(expected))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock a GET endpoint returning JSON
    pub async fn mock_get_json(&self, endpoint: &str, response: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .mount(&self.server)
            .await;
    }

    /// Mock any method on an endpoint returning an error status with a body
    pub async fn mock_status(&self, endpoint: &str, status: u16, body: &str) {
        Mock::given(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Mock a POST endpoint returning a non-JSON body with 200
    pub async fn mock_post_garbage(&self, endpoint: &str) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&self.server)
            .await;
    }

    /// Mount the endpoints a healthy engine answers at start-up
    pub async fn mock_healthy_engine(&self) {
        self.mock_health(200).await;
        self.mock_get_json("/palettes", json!({"ColorBrewer": ["Set1"]}))
            .await;
        self.mock_post_json(
            "/generate",
            json!([
                {"r": 1.0, "g": 0.0, "b": 0.0},
                {"r": 0.0, "g": 0.0, "b": 1.0}
            ]),
        )
        .await;
        self.mock_post_json(
            "/analyze",
            json!({
                "normal": {
                    "difference_matrix": [[0.0, 52.1], [52.1, 0.0]],
                    "min_distances": [52.1, 52.1],
                    "bg_min_distance": null
                }
            }),
        )
        .await;
    }

    /// Requests the engine received on `endpoint`, as JSON bodies
    pub async fn received_bodies(&self, endpoint: &str) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == endpoint)
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }
}
