use crate::agent::Agent;
use crate::config::ChatConfig;
use crate::error::{AgentInvocationError, SessionError};
use crate::llm::{LLM, LLMConfig};
use crate::message::{MessageEntry, extends, history_from_input_list};
use crate::prompts::{self, AVATAR_SIZE, AVATAR_URL, GREETING, THINKING};
use crate::runner::{RunConfig, RunResult, Runner};
use crate::ui::{Avatar, MessageBoard, UiEvent, UiMessage};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, broadcast};
use uuid::Uuid;

pub const USER_AUTHOR: &str = "user";

/// Where the session is in its current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    Idle,
    AwaitingResponse,
    Delivered,
    Failed,
}

/// Per-session mutable state. Owned by exactly one `ChatSession`.
pub struct SessionState {
    pub history: Vec<MessageEntry>,
    pub config: RunConfig,
    pub turn: TurnState,
}

/// Result of one user message.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// `Delivered` or `Failed`.
    pub state: TurnState,
    /// Id of the visible message that held the placeholder.
    pub message_id: Uuid,
    /// What that message shows now.
    pub content: String,
}

#[derive(Clone)]
/// One live chat session.
///
/// Holds the agent, the run configuration and history, and the message board
/// the client watches. At most one turn is in flight at a time: a message that
/// arrives while the runner is still working is rejected, not queued.
pub struct ChatSession {
    pub id: String,
    agent: Arc<Agent>,
    state: Arc<RwLock<SessionState>>,
    runner: Arc<dyn Runner>,
    board: MessageBoard,
    turn_gate: Arc<Mutex<()>>,
}

impl ChatSession {
    /// Sets up a new session and greets the user.
    ///
    /// Binds a model handle to the configured endpoint and key, wraps it in a
    /// run configuration, builds the assistant persona, starts with empty
    /// history, then sends the avatar and exactly one greeting message.
    pub async fn start(id: impl Into<String>, config: &ChatConfig, runner: Arc<dyn Runner>) -> Self {
        let llm = LLM::new(LLMConfig {
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        });
        let run_config = RunConfig {
            model: llm.clone(),
            tracing_disabled: config.tracing_disabled,
        };
        let agent = Agent::assistant(llm);

        let session = Self {
            id: id.into(),
            agent: Arc::new(agent),
            state: Arc::new(RwLock::new(SessionState {
                history: Vec::new(),
                config: run_config,
                turn: TurnState::Idle,
            })),
            runner,
            board: MessageBoard::new(),
            turn_gate: Arc::new(Mutex::new(())),
        };

        session
            .board
            .set_avatar(Avatar {
                name: session.agent.name.clone(),
                url: AVATAR_URL.to_string(),
                size: AVATAR_SIZE.to_string(),
            })
            .await;
        session
            .board
            .send(
                UiMessage::new(session.agent.name.clone(), GREETING)
                    .with_actions(prompts::greeting_actions()),
            )
            .await;

        tracing::info!(session = session.id.as_str(), "chat session started");
        session
    }

    /// Runs one turn for an inbound user message.
    ///
    /// The placeholder is visible before the runner is called. On success the
    /// placeholder takes the runner's final output and history becomes the
    /// runner's returned history. On failure the placeholder takes the failure
    /// text and history keeps the new user entry with no assistant reply.
    ///
    /// The turn runs on its own task holding the turn gate, so dropping the
    /// caller does not cancel it: it still ends `Delivered` or `Failed`.
    pub async fn handle_message(
        &self,
        content: impl Into<String>,
    ) -> Result<TurnOutcome, SessionError> {
        let content = content.into();
        let gate = self
            .turn_gate
            .clone()
            .try_lock_owned()
            .map_err(|_| SessionError::TurnInFlight(self.id.clone()))?;

        let session = self.clone();
        tokio::spawn(async move {
            let outcome = session.run_turn(content).await;
            drop(gate);
            outcome
        })
        .await
        .map_err(|e| SessionError::TurnAborted(e.to_string()))
    }

    async fn run_turn(&self, content: String) -> TurnOutcome {
        self.board
            .send(UiMessage::new(USER_AUTHOR, content.clone()))
            .await;
        let placeholder = self
            .board
            .send(UiMessage::new(self.agent.name.clone(), THINKING))
            .await;

        let (input, run_config) = {
            let mut state = self.state.write().await;
            state.history.push(MessageEntry::user(content.clone()));
            state.turn = TurnState::AwaitingResponse;
            (state.history.clone(), state.config.clone())
        };

        let result = self
            .runner
            .run(&self.agent, &input, &run_config)
            .await
            .and_then(|result| {
                let history = history_from_input_list(&result.to_input_list())?;
                Ok((result, history))
            });

        match result {
            Ok((RunResult { final_output, .. }, history)) => {
                if !extends(&input, &history) {
                    tracing::warn!(
                        session = self.id.as_str(),
                        sent = input.len(),
                        returned = history.len(),
                        "runner history does not start with the turn's input"
                    );
                }
                self.board.update(placeholder, final_output.clone()).await;
                {
                    let mut state = self.state.write().await;
                    state.history = history;
                    state.turn = TurnState::Idle;
                }
                tracing::info!("User: {}", content);
                tracing::info!("Assistant: {}", final_output);
                TurnOutcome {
                    state: TurnState::Delivered,
                    message_id: placeholder,
                    content: final_output,
                }
            }
            Err(err) => self.fail_turn(placeholder, err).await,
        }
    }

    /// Handles a click on one of the greeting's action buttons by sending the
    /// action's value as if the user had typed it.
    pub async fn handle_action(&self, name: &str) -> Result<TurnOutcome, SessionError> {
        let value = self
            .board
            .messages()
            .await
            .into_iter()
            .flat_map(|m| m.actions)
            .find(|action| action.name == name)
            .map(|action| action.value)
            .ok_or_else(|| SessionError::UnknownAction(name.to_string()))?;

        tracing::debug!(session = self.id.as_str(), action = name, "action clicked");
        self.handle_message(value).await
    }

    async fn fail_turn(&self, placeholder: Uuid, err: AgentInvocationError) -> TurnOutcome {
        tracing::error!("Error: {}", err);
        let text = prompts::failure_message(&err.to_string());
        self.board.update(placeholder, text.clone()).await;
        self.state.write().await.turn = TurnState::Idle;
        TurnOutcome {
            state: TurnState::Failed,
            message_id: placeholder,
            content: text,
        }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub async fn history(&self) -> Vec<MessageEntry> {
        self.state.read().await.history.clone()
    }

    pub async fn turn_state(&self) -> TurnState {
        self.state.read().await.turn
    }

    pub async fn messages(&self) -> Vec<UiMessage> {
        self.board.messages().await
    }

    pub fn board(&self) -> &MessageBoard {
        &self.board
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.board.subscribe()
    }
}
