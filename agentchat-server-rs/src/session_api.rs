use crate::handlers::{error_response, AppState};
use crate::models::{HistoryPage, MessageRequest, MessagesPage, SessionStarted};
use agentchat_sdk_rs::{
    config::ChatConfig,
    error::SessionError,
    runner::Runner,
    session::{ChatSession, TurnOutcome},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
};
use std::{collections::HashMap, convert::Infallible, sync::Arc};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use uuid::Uuid;

/// Live chat sessions, keyed by id.
///
/// Each session owns its own history and message board; nothing is shared
/// between them except the process configuration and the runner.
pub struct SessionManager {
    config: ChatConfig,
    runner: Arc<dyn Runner>,
    sessions: HashMap<String, ChatSession>,
}

impl SessionManager {
    pub fn new(config: ChatConfig, runner: Arc<dyn Runner>) -> Self {
        Self {
            config,
            runner,
            sessions: HashMap::new(),
        }
    }

    /// What a new session needs, so it can be started without holding the
    /// manager's lock.
    pub fn session_parts(&self) -> (ChatConfig, Arc<dyn Runner>) {
        (self.config.clone(), self.runner.clone())
    }

    pub fn insert(&mut self, session: ChatSession) {
        self.sessions.insert(session.id.clone(), session);
    }

    pub fn get_session(&self, id: &str) -> Option<ChatSession> {
        self.sessions.get(id).cloned()
    }

    /// Drops the session and everything it holds. A turn already running
    /// finishes against its own handle but is no longer reachable.
    pub fn end_session(&mut self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

async fn lookup(state: &AppState, id: &str) -> Option<ChatSession> {
    state.session_manager.read().await.get_session(id)
}

fn session_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "session_not_found", "session not found")
}

fn turn_response(result: Result<TurnOutcome, SessionError>) -> Response {
    match result {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e @ SessionError::TurnInFlight(_)) => {
            error_response(StatusCode::CONFLICT, "turn_in_flight", &e.to_string())
        }
        Err(e @ SessionError::UnknownAction(_)) => {
            error_response(StatusCode::NOT_FOUND, "action_not_found", &e.to_string())
        }
        Err(e @ SessionError::TurnAborted(_)) => {
            tracing::error!("{}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "turn_aborted",
                &e.to_string(),
            )
        }
    }
}

// Handlers

pub async fn start_session(State(state): State<Arc<AppState>>) -> Response {
    let (config, runner) = state.session_manager.read().await.session_parts();
    let session = ChatSession::start(Uuid::new_v4().to_string(), &config, runner).await;
    state.session_manager.write().await.insert(session.clone());

    let greeting = session.messages().await.into_iter().next();
    match greeting {
        Some(greeting) => Json(SessionStarted {
            id: session.id.clone(),
            avatar: session.board().avatar().await,
            greeting,
        })
        .into_response(),
        None => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "greeting_missing",
            "session started without a greeting",
        ),
    }
}

pub async fn submit_message(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MessageRequest>,
) -> Response {
    if payload.content.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "empty_message",
            "message content is empty",
        );
    }

    let Some(session) = lookup(&state, &id).await else {
        return session_not_found();
    };

    turn_response(session.handle_message(payload.content).await)
}

pub async fn trigger_action(
    Path((id, name)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(session) = lookup(&state, &id).await else {
        return session_not_found();
    };

    turn_response(session.handle_action(&name).await)
}

pub async fn list_messages(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match lookup(&state, &id).await {
        Some(session) => Json(MessagesPage {
            items: session.messages().await,
        })
        .into_response(),
        None => session_not_found(),
    }
}

pub async fn get_history(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match lookup(&state, &id).await {
        Some(session) => Json(HistoryPage {
            items: session.history().await,
        })
        .into_response(),
        None => session_not_found(),
    }
}

pub async fn stream_events(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(session) = lookup(&state, &id).await else {
        return session_not_found();
    };

    let stream = BroadcastStream::new(session.subscribe()).map(|result| match result {
        Ok(event) => {
            let data = serde_json::to_string(&event).unwrap_or_default();
            Ok::<_, Infallible>(Event::default().data(data))
        }
        Err(_) => Ok(Event::default().data("{\"type\":\"error\",\"message\":\"stream lagged\"}")),
    });

    Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response()
}

pub async fn end_session(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let mut manager = state.session_manager.write().await;
    if manager.end_session(&id) {
        tracing::info!(
            session = id.as_str(),
            active = manager.len(),
            "chat session ended"
        );
        StatusCode::NO_CONTENT.into_response()
    } else {
        session_not_found()
    }
}
