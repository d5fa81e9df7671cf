use async_trait::async_trait;
use prompt_relay::{
    error::UpstreamError,
    llm::{
        CallOptions, ChatCompletionRequest, ChatCompletionResponse, Choice, LlmClient,
        ResponseMessage,
    },
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Behavior {
    Reply(String),
    /// Replies with `echo: <user prompt>`.
    Echo,
    Fail(UpstreamError),
}

/// Mock LLM client for testing
#[derive(Debug, Clone)]
pub struct MockLlmClient {
    behavior: Behavior,
    delay: Option<Duration>,
    pub requests: Arc<Mutex<Vec<(ChatCompletionRequest, CallOptions)>>>,
}

impl MockLlmClient {
    pub fn replying(content: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Reply(content.into()))
    }

    pub fn echoing() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    pub fn failing(error: UpstreamError) -> Self {
        Self::with_behavior(Behavior::Fail(error))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_requests(&self) -> Vec<(ChatCompletionRequest, CallOptions)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
        options: CallOptions,
    ) -> Result<ChatCompletionResponse, UpstreamError> {
        self.requests
            .lock()
            .unwrap()
            .push((request.clone(), options));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let content = match &self.behavior {
            Behavior::Reply(content) => content.clone(),
            Behavior::Echo => format!("echo: {}", request.messages[1].content),
            Behavior::Fail(error) => return Err(error.clone()),
        };

        Ok(create_mock_chat_response(&content))
    }
}

pub fn create_mock_chat_response(content: &str) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: Some("chatcmpl-mock".to_string()),
        model: Some("deepseek-chat".to_string()),
        choices: vec![Choice {
            index: 0,
            message: ResponseMessage {
                role: Some("assistant".to_string()),
                content: Some(content.to_string()),
            },
            finish_reason: Some("stop".to_string()),
        }],
        usage: None,
    }
}
