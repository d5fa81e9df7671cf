use super::types::ErrorResponse;
use crate::{config::MessagesConfig, error::UpstreamErrorKind, relay::RelayError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// A client-facing failure: status plus a sanitized message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_request(messages: &MessagesConfig) -> Self {
        Self::new(StatusCode::BAD_REQUEST, &messages.invalid_request)
    }

    pub fn server_error(messages: &MessagesConfig) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, &messages.server_error)
    }

    pub fn from_relay(err: &RelayError, messages: &MessagesConfig) -> Self {
        match err {
            RelayError::MissingPrompt => {
                Self::new(StatusCode::BAD_REQUEST, &messages.missing_prompt)
            }
            RelayError::PromptTooLong { max } => {
                Self::new(StatusCode::BAD_REQUEST, messages.prompt_too_long(*max))
            }
            RelayError::Upstream(upstream) => match upstream.kind() {
                UpstreamErrorKind::Timeout => {
                    Self::new(StatusCode::GATEWAY_TIMEOUT, &messages.timeout)
                }
                UpstreamErrorKind::ClientError
                | UpstreamErrorKind::ServerError
                | UpstreamErrorKind::Transport
                | UpstreamErrorKind::InvalidResponse => {
                    Self::new(StatusCode::BAD_GATEWAY, &messages.upstream_error)
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
