use super::{
    error::ApiError,
    types::{AnalysisResponse, OptimizedResponse, PreflightResponse, PromptRequest, QuestionResponse},
};
use crate::{
    config::MessagesConfig,
    relay::{Operation, Relay, RelayError},
};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    pub messages: Arc<MessagesConfig>,
    pub allowed_origin: HeaderValue,
}

type Payload = Result<Json<PromptRequest>, JsonRejection>;

pub async fn start_analysis(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<Json<QuestionResponse>, ApiError> {
    let request = parse(&state, payload)?;
    let prompt = request.prompt.unwrap_or_default();

    let question = relay(&state, Operation::StartAnalysis, &prompt).await?;
    Ok(Json(QuestionResponse { question }))
}

pub async fn analyze(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let request = parse(&state, payload)?;
    let Some(prompt) = request.prompt else {
        return Err(ApiError::from_relay(&RelayError::MissingPrompt, &state.messages));
    };

    let analysis = relay(&state, Operation::Analyze, &prompt).await?;
    Ok(Json(AnalysisResponse { analysis }))
}

pub async fn optimize(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<Json<OptimizedResponse>, ApiError> {
    let request = parse(&state, payload)?;
    let prompt = request.prompt.unwrap_or_default();

    let optimized = relay(&state, Operation::Optimize, &prompt).await?;
    Ok(Json(OptimizedResponse { optimized }))
}

/// Answers a browser preflight without touching the upstream.
pub async fn preflight(State(state): State<AppState>) -> impl IntoResponse {
    (
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, state.allowed_origin.clone()),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type"),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("POST, OPTIONS"),
            ),
        ],
        Json(PreflightResponse {
            message: "Preflight Accepted",
        }),
    )
}

pub async fn not_found(State(state): State<AppState>) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, &state.messages.not_found)
}

pub async fn method_not_allowed(State(state): State<AppState>) -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, &state.messages.method_not_allowed)
}

fn parse(state: &AppState, payload: Payload) -> Result<PromptRequest, ApiError> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            warn!("Rejected request body: {}", rejection.body_text());
            Err(ApiError::invalid_request(&state.messages))
        }
    }
}

async fn relay(state: &AppState, operation: Operation, prompt: &str) -> Result<String, ApiError> {
    info!(
        "Received {} request ({} chars)",
        operation,
        prompt.chars().count()
    );

    match state.relay.run(operation, prompt).await {
        Ok(reply) => {
            info!("Successfully relayed {} request", operation);
            Ok(reply)
        }
        Err(e) => {
            let api_error = ApiError::from_relay(&e, &state.messages);
            warn!(
                "Failed to relay {} request: {} (responding {})",
                operation, e, api_error.status
            );
            Err(api_error)
        }
    }
}
