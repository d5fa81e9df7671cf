use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use prompt_relay::{
    config::Config,
    llm::LlmClient,
    server::{AppState, router},
};
use serde_json::Value;
use std::sync::Arc;

pub const TEST_ORIGIN: &str = "http://localhost:8000";

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.upstream.api_key = "test-api-key".to_string();
    config.server.allowed_origin = TEST_ORIGIN.to_string();
    config
}

pub fn create_test_app(client: Arc<dyn LlmClient>) -> Router {
    create_test_app_with_config(client, &create_test_config())
}

pub fn create_test_app_with_config(client: Arc<dyn LlmClient>, config: &Config) -> Router {
    let state = AppState::new(client, config).unwrap();
    router(state)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn options(uri: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri(uri)
        .header("origin", TEST_ORIGIN)
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
}
