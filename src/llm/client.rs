use super::types::*;
use crate::{Result, config::UpstreamConfig, error::UpstreamError};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, warn};

const RETRY_BACKOFF: Duration = Duration::from_millis(200);

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
        options: CallOptions,
    ) -> std::result::Result<ChatCompletionResponse, UpstreamError>;
}

/// Chat-completion client over a single pooled `reqwest::Client`.
pub struct HttpLlmClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpLlmClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_once(
        &self,
        request: &ChatCompletionRequest,
        timeout: Duration,
    ) -> std::result::Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .timeout(timeout)
            .json(request)
            .send()
            .await
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
        options: CallOptions,
    ) -> std::result::Result<ChatCompletionResponse, UpstreamError> {
        debug!(
            "Creating chat completion with {} messages (timeout {:?}, retries {})",
            request.messages.len(),
            options.timeout,
            options.retries
        );

        let mut attempt = 0;
        let response = loop {
            match self.send_once(&request, options.timeout).await {
                Ok(response) => break response,
                Err(e) if e.is_connect() && attempt < options.retries => {
                    attempt += 1;
                    warn!(
                        "Connection to upstream failed (attempt {}/{}): {}",
                        attempt,
                        options.retries + 1,
                        e
                    );
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(e) => return Err(e.into()),
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::status(status.as_u16(), body));
        }

        let completion: ChatCompletionResponse = response.json().await?;

        debug!(
            "Received chat completion response with {} choices",
            completion.choices.len()
        );

        Ok(completion)
    }
}
