use crate::error::ConfigError;
use std::fmt;
use std::net::SocketAddr;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const BASE_URL_VAR: &str = "AGENTCHAT_BASE_URL";
pub const MODEL_VAR: &str = "AGENTCHAT_MODEL";
pub const BIND_VAR: &str = "AGENTCHAT_BIND";
pub const TRACING_DISABLED_VAR: &str = "AGENTCHAT_TRACING_DISABLED";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// Process-wide settings needed to serve chat sessions.
///
/// Built once at startup. The only required value is the model API key; there
/// is no fallback for it, so a `ChatConfig` existing means sessions can talk to
/// the upstream model.
#[derive(Clone)]
pub struct ChatConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub bind_addr: SocketAddr,
    pub tracing_disabled: bool,
}

impl ChatConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Call `dotenv::dotenv()` first if values should come from a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(API_KEY_VAR.to_string()))?;

        let base_url = normalize_base_url(
            lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        )?;

        let model = lookup(MODEL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let bind = lookup(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                var: BIND_VAR.to_string(),
                value: bind.clone(),
                reason: e.to_string(),
            })?;

        let tracing_disabled = match lookup(TRACING_DISABLED_VAR) {
            None => true,
            Some(raw) => parse_flag(TRACING_DISABLED_VAR, &raw)?,
        };

        Ok(Self {
            api_key,
            base_url,
            model,
            bind_addr,
            tracing_disabled,
        })
    }
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("bind_addr", &self.bind_addr)
            .field("tracing_disabled", &self.tracing_disabled)
            .finish()
    }
}

fn normalize_base_url(raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            var: BASE_URL_VAR.to_string(),
            value: raw.clone(),
            reason: "expected an http(s) URL".to_string(),
        });
    }
    // genai joins the adapter path onto the endpoint, which needs the slash.
    if trimmed.ends_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{}/", trimmed))
    }
}

fn parse_flag(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw.to_string(),
            reason: "expected true/false/1/0".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = ChatConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey(ref var) if var == API_KEY_VAR));
    }

    #[test]
    fn test_blank_api_key_is_fatal() {
        let err = ChatConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey(_)));
    }

    #[test]
    fn test_defaults_applied() {
        let config = ChatConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "key")])).unwrap();
        assert_eq!(config.api_key, "key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.bind_addr, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert!(config.tracing_disabled);
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = ChatConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "key"),
            (BASE_URL_VAR, "http://localhost:8080/v1"),
            (MODEL_VAR, "llama3"),
            (BIND_VAR, "127.0.0.1:9000"),
            (TRACING_DISABLED_VAR, "0"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/v1/");
        assert_eq!(config.model, "llama3");
        assert_eq!(config.bind_addr.port(), 9000);
        assert!(!config.tracing_disabled);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ChatConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "key"),
            (BASE_URL_VAR, "ftp://example.com"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref var, .. } if var == BASE_URL_VAR));

        let err = ChatConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "key"),
            (BIND_VAR, "not-an-addr"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref var, .. } if var == BIND_VAR));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config =
            ChatConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "super-secret")])).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
