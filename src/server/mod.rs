mod error;
pub mod handlers;
mod types;

pub use error::ApiError;
pub use handlers::AppState;
pub use types::*;

use crate::{
    Error, Result,
    config::{Config, MessagesConfig},
    llm::{HttpLlmClient, LlmClient},
    relay::Relay,
};
use axum::{
    Router,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
    routing::post,
};
use std::{any::Any, net::SocketAddr, sync::Arc};
use tower_http::{
    catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info};

impl AppState {
    pub fn new(client: Arc<dyn LlmClient>, config: &Config) -> Result<Self> {
        let allowed_origin = HeaderValue::from_str(&config.server.allowed_origin)
            .map_err(|e| Error::config(format!("invalid allowed_origin: {e}")))?;

        Ok(Self {
            relay: Arc::new(Relay::new(
                client,
                &config.upstream,
                config.relay.clone(),
            )),
            messages: Arc::new(config.messages.clone()),
            allowed_origin,
        })
    }
}

/// Builds the relay router. Every response, including errors and
/// fallbacks, carries the allow-origin and allow-headers headers.
pub fn router(state: AppState) -> Router {
    let allowed_origin = state.allowed_origin.clone();
    let messages = state.messages.clone();

    Router::new()
        .route(
            "/start-analysis",
            post(handlers::start_analysis)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/analyze",
            post(handlers::analyze)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/optimize",
            post(handlers::optimize)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| panic_response(panic, &messages),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            allowed_origin,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
}

fn panic_response(panic: Box<dyn Any + Send + 'static>, messages: &MessagesConfig) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Handler panicked: {}", detail);

    ApiError::server_error(messages).into_response()
}

pub async fn run(config: Config) -> Result<()> {
    // One pooled client shared by all handlers
    let client = HttpLlmClient::new(&config.upstream)?;
    info!("Relaying to upstream endpoint {}", client.endpoint());

    let app_state = AppState::new(Arc::new(client), &config)?;
    let app = router(app_state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!(
        "Starting server on {} (allowed origin {})",
        addr, config.server.allowed_origin
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}
