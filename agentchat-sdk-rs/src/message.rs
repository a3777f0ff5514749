use crate::error::HistoryError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One entry of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub role: Role,
    pub content: String,
}

impl MessageEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn to_value(&self) -> Value {
        json!({ "role": self.role.as_str(), "content": self.content })
    }
}

/// Serializes typed history into the runner's input-list shape.
pub fn to_input_list(history: &[MessageEntry]) -> Vec<Value> {
    history.iter().map(MessageEntry::to_value).collect()
}

/// Whether `history` keeps `input` unchanged as its leading entries.
pub fn extends(input: &[MessageEntry], history: &[MessageEntry]) -> bool {
    history.starts_with(input)
}

/// Maps the runner's raw history back into typed entries.
///
/// Content is either a plain string or a list of text parts
/// (`{"type": "output_text", "text": ...}`), which are concatenated.
/// Anything else fails the whole list.
pub fn history_from_input_list(items: &[Value]) -> Result<Vec<MessageEntry>, HistoryError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let obj = item.as_object().ok_or(HistoryError::NotAnObject(index))?;
            entry_from_object(index, obj)
        })
        .collect()
}

fn entry_from_object(index: usize, obj: &Map<String, Value>) -> Result<MessageEntry, HistoryError> {
    let role = match obj.get("role").and_then(Value::as_str) {
        Some("user") => Role::User,
        Some("assistant") => Role::Assistant,
        Some(other) => {
            return Err(HistoryError::UnknownRole {
                index,
                role: other.to_string(),
            });
        }
        None => {
            return Err(HistoryError::UnknownRole {
                index,
                role: String::new(),
            });
        }
    };

    let content = match obj.get("content") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(parts)) => {
            let texts: Vec<&str> = parts
                .iter()
                .filter(|part| {
                    matches!(
                        part.get("type").and_then(Value::as_str),
                        Some("output_text") | Some("input_text") | Some("text")
                    )
                })
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect();
            if texts.is_empty() {
                return Err(HistoryError::MissingContent(index));
            }
            texts.concat()
        }
        _ => return Err(HistoryError::MissingContent(index)),
    };

    Ok(MessageEntry { role, content })
}
