use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

const EVENT_CAPACITY: usize = 64;

/// A quick-reply button attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiAction {
    pub name: String,
    pub label: String,
    pub value: String,
}

impl UiAction {
    pub fn new(name: &str, label: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub name: String,
    pub url: String,
    pub size: String,
}

/// A message as the chat client displays it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiMessage {
    pub id: Uuid,
    pub author: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<UiAction>,
    pub created_at: DateTime<Utc>,
}

impl UiMessage {
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: author.into(),
            content: content.into(),
            actions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_actions(mut self, actions: Vec<UiAction>) -> Self {
        self.actions = actions;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    MessageSent(UiMessage),
    MessageUpdated { id: Uuid, content: String },
    AvatarSet(Avatar),
}

#[derive(Default)]
struct Board {
    messages: Vec<UiMessage>,
    avatar: Option<Avatar>,
}

/// The visible side of one chat session.
///
/// Keeps every message the client has been shown and fans each change out to
/// subscribers so a streaming client sees the placeholder appear and then get
/// replaced.
#[derive(Clone)]
pub struct MessageBoard {
    board: Arc<RwLock<Board>>,
    events: broadcast::Sender<UiEvent>,
}

impl MessageBoard {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            board: Arc::new(RwLock::new(Board::default())),
            events,
        }
    }

    pub async fn send(&self, message: UiMessage) -> Uuid {
        let id = message.id;
        self.board.write().await.messages.push(message.clone());
        // No subscribers is fine.
        let _ = self.events.send(UiEvent::MessageSent(message));
        id
    }

    /// Replaces the content of a message already sent. Returns false if the id
    /// is unknown.
    pub async fn update(&self, id: Uuid, content: impl Into<String>) -> bool {
        let content = content.into();
        {
            let mut board = self.board.write().await;
            match board.messages.iter_mut().find(|m| m.id == id) {
                Some(message) => message.content = content.clone(),
                None => return false,
            }
        }
        let _ = self.events.send(UiEvent::MessageUpdated { id, content });
        true
    }

    pub async fn set_avatar(&self, avatar: Avatar) {
        self.board.write().await.avatar = Some(avatar.clone());
        let _ = self.events.send(UiEvent::AvatarSet(avatar));
    }

    pub async fn avatar(&self) -> Option<Avatar> {
        self.board.read().await.avatar.clone()
    }

    pub async fn messages(&self) -> Vec<UiMessage> {
        self.board.read().await.messages.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<UiMessage> {
        self.board
            .read()
            .await
            .messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.events.subscribe()
    }
}

impl Default for MessageBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_then_update_notifies_subscribers() {
        let board = MessageBoard::new();
        let mut rx = board.subscribe();

        let id = board.send(UiMessage::new("assistant", "Thinking...")).await;
        assert!(board.update(id, "Hello!").await);

        match rx.recv().await.unwrap() {
            UiEvent::MessageSent(m) => assert_eq!(m.content, "Thinking..."),
            other => panic!("unexpected event: {:?}", other),
        }
        match rx.recv().await.unwrap() {
            UiEvent::MessageUpdated { id: updated, content } => {
                assert_eq!(updated, id);
                assert_eq!(content, "Hello!");
            }
            other => panic!("unexpected event: {:?}", other),
        }

        let messages = board.messages().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "Hello!");
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let board = MessageBoard::new();
        assert!(!board.update(Uuid::new_v4(), "nope").await);
        assert!(board.messages().await.is_empty());
    }

    #[test]
    fn test_event_tagging() {
        let event = UiEvent::MessageUpdated {
            id: Uuid::nil(),
            content: "x".to_string(),
        };
        let value = serde_json::to_value(event).unwrap();
        assert_eq!(value["type"], "message_updated");
    }
}
