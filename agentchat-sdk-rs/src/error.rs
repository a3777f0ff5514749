use thiserror::Error;

/// Startup configuration failures. Any of these stops the process before it
/// serves a single session.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set in the environment variables")]
    MissingApiKey(String),

    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: String,
        value: String,
        reason: String,
    },
}

/// Any failure while the runner talks to the upstream model.
///
/// Auth, network, rate limit and malformed responses all collapse into this one
/// kind; only the message survives.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct AgentInvocationError {
    pub message: String,
}

impl AgentInvocationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<genai::Error> for AgentInvocationError {
    fn from(err: genai::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<HistoryError> for AgentInvocationError {
    fn from(err: HistoryError) -> Self {
        Self::new(format!("malformed history from runner: {}", err))
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("entry {0} is not an object")]
    NotAnObject(usize),

    #[error("entry {index} has unsupported role {role:?}")]
    UnknownRole { index: usize, role: String },

    #[error("entry {0} has no text content")]
    MissingContent(usize),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session {0} already has a turn awaiting a response")]
    TurnInFlight(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("turn task ended abnormally: {0}")]
    TurnAborted(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_error_displays_underlying_message() {
        let err = AgentInvocationError::new("timeout");
        assert_eq!(err.to_string(), "timeout");
    }

    #[test]
    fn test_history_error_is_wrapped_as_invocation_error() {
        let err: AgentInvocationError = HistoryError::MissingContent(2).into();
        assert!(err.message.contains("entry 2 has no text content"));
    }
}
