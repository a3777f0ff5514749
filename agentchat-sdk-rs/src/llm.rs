use crate::error::AgentInvocationError;
use genai::adapter::AdapterKind;
use genai::chat::{ChatMessage, ChatRequest};
use genai::resolver::{AuthData, Endpoint, ServiceTargetResolver};
use genai::{Client, ModelIden, ServiceTarget};
use serde::Deserialize;

/// Handle to the hosted model, bound to one endpoint and one API key.
///
/// Every request goes through the OpenAI-compatible chat-completions adapter,
/// whatever the model name looks like, so Gemini (or any other compatible
/// host) can be reached by pointing `base_url` at it.
#[derive(Clone)]
pub struct LLM {
    pub model: String,
    pub base_url: String,
    pub client: Client,
}

#[derive(Deserialize, Clone)]
pub struct LLMConfig {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
}

impl LLM {
    pub fn new(config: LLMConfig) -> Self {
        let LLMConfig {
            model,
            api_key,
            base_url,
        } = config;

        let endpoint_url = base_url.clone();
        let target_resolver = ServiceTargetResolver::from_resolver_fn(
            move |service_target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
                let ServiceTarget { model, .. } = service_target;
                Ok(ServiceTarget {
                    endpoint: Endpoint::from_owned(endpoint_url.clone()),
                    auth: AuthData::from_single(api_key.clone()),
                    model: ModelIden::new(AdapterKind::OpenAI, model.model_name),
                })
            },
        );

        let client = Client::builder()
            .with_service_target_resolver(target_resolver)
            .build();

        Self {
            model,
            base_url,
            client,
        }
    }

    pub async fn completion(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<LLMResponse, AgentInvocationError> {
        let chat_req = ChatRequest::new(messages);

        let output = self.client.exec_chat(&self.model, chat_req, None).await?;

        let text: String = output.content.texts().join("");
        if text.is_empty() {
            return Err(AgentInvocationError::new(format!(
                "model {} returned no text output",
                self.model
            )));
        }

        Ok(LLMResponse { content: text })
    }
}

#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_llm_instantiation() {
        let config = LLMConfig {
            model: "gemini-2.0-flash".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai/".to_string(),
        };
        let llm = LLM::new(config);
        assert_eq!(llm.model, "gemini-2.0-flash");
        assert!(llm.base_url.ends_with("/openai/"));
    }

    #[tokio::test]
    async fn test_llm_completion() {
        dotenv::dotenv().ok();

        let api_key = match std::env::var(crate::config::API_KEY_VAR) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                println!("Skipping test_llm_completion because GEMINI_API_KEY is not set");
                return;
            }
        };

        let llm = LLM::new(LLMConfig {
            model: crate::config::DEFAULT_MODEL.to_string(),
            api_key,
            base_url: crate::config::DEFAULT_BASE_URL.to_string(),
        });

        let messages = vec![ChatMessage::user("Say hello in Rust")];
        match llm.completion(messages).await {
            Ok(response) => assert!(!response.content.is_empty()),
            // Quota and network failures are outside this crate's control.
            Err(e) => println!("LLM Completion Error: {}", e),
        }
    }
}
