//! The three relay operations. Each one validates the prompt, wraps it with
//! the endpoint's system instruction and returns the first completion choice.

use crate::{
    config::{EndpointConfig, RelayConfig, UpstreamConfig},
    error::UpstreamError,
    llm::{CallOptions, ChatCompletionRequest, ChatMessage, LlmClient},
};
use std::{fmt, sync::Arc};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    StartAnalysis,
    Analyze,
    Optimize,
}

impl Operation {
    /// Whether the prompt length limit applies.
    fn is_length_limited(self) -> bool {
        !matches!(self, Self::StartAnalysis)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StartAnalysis => "start-analysis",
            Self::Analyze => "analyze",
            Self::Optimize => "optimize",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("prompt is missing")]
    MissingPrompt,

    #[error("prompt exceeds {max} characters")]
    PromptTooLong { max: usize },

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

pub struct Relay {
    client: Arc<dyn LlmClient>,
    model: String,
    config: RelayConfig,
}

impl Relay {
    pub fn new(client: Arc<dyn LlmClient>, upstream: &UpstreamConfig, config: RelayConfig) -> Self {
        Self {
            client,
            model: upstream.model.clone(),
            config,
        }
    }

    fn endpoint(&self, operation: Operation) -> &EndpointConfig {
        match operation {
            Operation::StartAnalysis => &self.config.start_analysis,
            Operation::Analyze => &self.config.analyze,
            Operation::Optimize => &self.config.optimize,
        }
    }

    pub fn validate(&self, operation: Operation, prompt: &str) -> Result<(), RelayError> {
        let max = self.config.max_prompt_chars;
        if operation.is_length_limited() && prompt.chars().count() > max {
            return Err(RelayError::PromptTooLong { max });
        }
        Ok(())
    }

    pub fn build_request(&self, operation: Operation, prompt: &str) -> ChatCompletionRequest {
        let endpoint = self.endpoint(operation);
        ChatCompletionRequest {
            messages: vec![
                ChatMessage::system(endpoint.instruction(&self.config.language)),
                ChatMessage::user(prompt),
            ],
            model: self.model.clone(),
            temperature: endpoint.temperature,
        }
    }

    /// Validates `prompt`, calls the upstream once and returns the reply text.
    /// StartAnalysis replies are trimmed.
    pub async fn run(&self, operation: Operation, prompt: &str) -> Result<String, RelayError> {
        self.validate(operation, prompt)?;

        let endpoint = self.endpoint(operation);
        let options = CallOptions {
            timeout: endpoint.timeout(),
            retries: endpoint.retries,
        };
        let request = self.build_request(operation, prompt);

        debug!(
            "Relaying {} request ({} prompt chars)",
            operation,
            prompt.chars().count()
        );

        let response = self
            .client
            .create_chat_completion(request, options)
            .await
            .map_err(|e| {
                error!("Upstream call for {} failed ({:?}): {}", operation, e.kind(), e);
                e
            })?;

        let content = response.first_content().ok_or_else(|| {
            error!("Upstream reply for {} carried no content", operation);
            UpstreamError::InvalidResponse("response has no choices".to_string())
        })?;

        Ok(match operation {
            Operation::StartAnalysis => content.trim().to_string(),
            Operation::Analyze | Operation::Optimize => content.to_string(),
        })
    }
}
