use crate::ui::UiAction;

pub const ASSISTANT_NAME: &str = "Anas's AI Assistant";

pub const ASSISTANT_INSTRUCTIONS: &str = "You are a friendly, knowledgeable, and slightly enthusiastic AI assistant created by Anas. \
Your goal is to provide helpful information, answer questions clearly, and make interactions enjoyable. \
Always be polite, concise, and offer to assist further. \
You can use emojis sparingly to add a touch of warmth and personality. \
Do not act like a generic chatbot; strive to be engaging and proactive.";

pub const AVATAR_URL: &str = "/public/assistant_avatar.png";
pub const AVATAR_SIZE: &str = "large";

pub const GREETING: &str = "👋 Hey there! I'm Anas's AI Assistant, ready to help you out. \
What's on your mind today? Let's get started! 😊";

pub const THINKING: &str = "Thinking...✨✨🤔🤔";

/// Quick-reply buttons attached to the greeting.
pub fn greeting_actions() -> Vec<UiAction> {
    vec![
        UiAction::new("suggest_topics", "💡 Suggest topics", "What can you do?"),
        UiAction::new("tell_joke", "🤣 Tell me a joke", "Tell me a joke!"),
        UiAction::new("give_feedback", "✍️ Give feedback", "I have feedback"),
    ]
}

/// Text shown in place of the answer when a turn fails.
pub fn failure_message(error: &str) -> String {
    format!(
        "Oops! Something went wrong on my end. 😥 I apologize for the inconvenience. \
It seems I'm having trouble processing that request right now. \
Please try again in a moment, or rephrase your request. \
If the problem persists, feel free to give me feedback so Anas can take a look! \
\n\n**(Error details for developer: `{}`)**",
        error
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_failure_message_embeds_error() {
        let text = failure_message("timeout");
        assert!(text.starts_with("Oops! Something went wrong"));
        assert!(text.contains("`timeout`"));
    }

    #[test]
    fn test_greeting_actions_have_unique_names() {
        let actions = greeting_actions();
        assert_eq!(actions.len(), 3);
        let names: HashSet<&str> = actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names.len(), actions.len());
    }
}
