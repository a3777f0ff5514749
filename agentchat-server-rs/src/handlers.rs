use crate::models::ErrorBody;
use crate::session_api::SessionManager;
use agentchat_sdk_rs::config::ChatConfig;
use agentchat_sdk_rs::runner::Runner;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct AppState {
    pub session_manager: Arc<RwLock<SessionManager>>,
}

impl AppState {
    /// Only a loaded `ChatConfig` can build the state, so no session can start
    /// without an API key.
    pub fn new(config: ChatConfig, runner: Arc<dyn Runner>) -> Self {
        Self {
            session_manager: Arc::new(RwLock::new(SessionManager::new(config, runner))),
        }
    }
}

pub fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            code: code.to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}

pub async fn health() -> impl IntoResponse {
    "OK"
}

pub async fn alive() -> impl IntoResponse {
    Json(json!({
        "status": "ok"
    }))
}
