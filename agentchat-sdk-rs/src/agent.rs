use crate::llm::LLM;
use crate::prompts::{ASSISTANT_INSTRUCTIONS, ASSISTANT_NAME};

/// Static persona handed to the runner on every turn.
///
/// Nothing mutates an agent once a session has built it; sessions share it
/// behind an `Arc`.
#[derive(Clone)]
pub struct Agent {
    pub name: String,
    pub instructions: String,
    pub model: LLM,
}

impl Agent {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>, model: LLM) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            model,
        }
    }

    /// The default assistant persona.
    pub fn assistant(model: LLM) -> Self {
        Self::new(ASSISTANT_NAME, ASSISTANT_INSTRUCTIONS, model)
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model.model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LLMConfig;

    #[test]
    fn test_assistant_persona() {
        let llm = LLM::new(LLMConfig {
            model: "gemini-2.0-flash".to_string(),
            api_key: "test-key".to_string(),
            base_url: "http://localhost:1234/v1/".to_string(),
        });
        let agent = Agent::assistant(llm);
        assert_eq!(agent.name, ASSISTANT_NAME);
        assert!(agent.instructions.contains("friendly"));
        assert_eq!(agent.model.model, "gemini-2.0-flash");
    }
}
