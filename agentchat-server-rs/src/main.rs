mod handlers;
mod models;
mod session_api;

use crate::handlers::AppState;
use agentchat_sdk_rs::{config::ChatConfig, runner::ModelRunner};
use axum::{
    routing::{get, post},
    Router,
};
use session_api::{
    end_session, get_history, list_messages, start_session, stream_events, submit_message,
    trigger_action,
};
use std::sync::Arc;
use tokio::net::TcpListener;

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/alive", get(handlers::alive))
        // Session Routes
        .route("/api/sessions", post(start_session))
        .route("/api/sessions/{id}", axum::routing::delete(end_session))
        .route(
            "/api/sessions/{id}/messages",
            post(submit_message).get(list_messages),
        )
        .route("/api/sessions/{id}/history", get(get_history))
        .route("/api/sessions/{id}/events", get(stream_events))
        .route("/api/sessions/{id}/actions/{name}", post(trigger_action))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    agentchat_sdk_rs::logger::init_logging();

    // No API key, no server.
    let config = match ChatConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("refusing to start: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!(
        model = config.model.as_str(),
        base_url = config.base_url.as_str(),
        "configuration loaded"
    );

    let bind_addr = config.bind_addr;
    let state = Arc::new(AppState::new(config, Arc::new(ModelRunner)));

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
