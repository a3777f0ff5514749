use agentchat_sdk_rs::message::MessageEntry;
use agentchat_sdk_rs::ui::{Avatar, UiMessage};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionStarted {
    pub id: String,
    pub avatar: Option<Avatar>,
    pub greeting: UiMessage,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageRequest {
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessagesPage {
    pub items: Vec<UiMessage>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HistoryPage {
    pub items: Vec<MessageEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
