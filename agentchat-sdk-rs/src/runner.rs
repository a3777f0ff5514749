use crate::agent::Agent;
use crate::error::AgentInvocationError;
use crate::llm::LLM;
use crate::message::{MessageEntry, Role, to_input_list};
use async_trait::async_trait;
use genai::chat::ChatMessage;
use serde_json::Value;

/// Everything needed to reach the upstream model for one turn.
#[derive(Clone)]
pub struct RunConfig {
    pub model: LLM,
    pub tracing_disabled: bool,
}

/// What a runner hands back after a successful turn.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub final_output: String,
    pub input_list: Vec<Value>,
}

impl RunResult {
    /// The full history after this run, in the runner's raw shape.
    pub fn to_input_list(&self) -> Vec<Value> {
        self.input_list.clone()
    }
}

#[async_trait]
/// Performs the upstream call for a turn.
///
/// Implementations receive the whole history (ending with the new user entry)
/// and return the final text plus the history as they see it afterwards. The
/// session never looks inside the call: it either returns or fails, once.
pub trait Runner: Send + Sync {
    async fn run(
        &self,
        agent: &Agent,
        input: &[MessageEntry],
        config: &RunConfig,
    ) -> Result<RunResult, AgentInvocationError>;
}

/// Runner that sends the history straight to the configured model.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelRunner;

#[async_trait]
impl Runner for ModelRunner {
    async fn run(
        &self,
        agent: &Agent,
        input: &[MessageEntry],
        config: &RunConfig,
    ) -> Result<RunResult, AgentInvocationError> {
        let mut messages = vec![ChatMessage::system(agent.instructions.clone())];
        messages.extend(input.iter().map(|entry| match entry.role {
            Role::User => ChatMessage::user(entry.content.clone()),
            Role::Assistant => ChatMessage::assistant(entry.content.clone()),
        }));

        if !config.tracing_disabled {
            tracing::debug!(
                agent = agent.name.as_str(),
                model = config.model.model.as_str(),
                entries = input.len(),
                "running agent"
            );
        }

        let response = config.model.completion(messages).await?;

        let mut input_list = to_input_list(input);
        input_list.push(MessageEntry::assistant(response.content.clone()).to_value());

        Ok(RunResult {
            final_output: response.content,
            input_list,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LLMConfig;

    #[test]
    fn test_run_result_to_input_list_returns_full_history() {
        let result = RunResult {
            final_output: "Hello!".to_string(),
            input_list: to_input_list(&[
                MessageEntry::user("Hi"),
                MessageEntry::assistant("Hello!"),
            ]),
        };
        assert_eq!(result.to_input_list().len(), 2);
        assert_eq!(result.to_input_list()[1]["content"], "Hello!");
    }

    #[tokio::test]
    async fn test_model_runner_against_live_model() {
        dotenv::dotenv().ok();
        let api_key = match std::env::var(crate::config::API_KEY_VAR) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                println!("Skipping test_model_runner_against_live_model because GEMINI_API_KEY is not set");
                return;
            }
        };

        let llm = LLM::new(LLMConfig {
            model: crate::config::DEFAULT_MODEL.to_string(),
            api_key,
            base_url: crate::config::DEFAULT_BASE_URL.to_string(),
        });
        let agent = Agent::assistant(llm.clone());
        let config = RunConfig {
            model: llm,
            tracing_disabled: true,
        };

        let input = vec![MessageEntry::user("Hi")];
        match ModelRunner.run(&agent, &input, &config).await {
            Ok(result) => {
                assert!(!result.final_output.is_empty());
                let items = result.to_input_list();
                assert_eq!(items.len(), 2);
                assert_eq!(items[0]["content"], "Hi");
            }
            Err(e) => println!("Runner Error: {}", e),
        }
    }
}
