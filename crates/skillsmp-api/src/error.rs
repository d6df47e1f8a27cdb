//! Error types for SkillsMP searches.

use thiserror::Error;

/// Errors that can end a search invocation.
///
/// None of these are retried; each maps to a distinct process exit code.
#[derive(Debug, Error)]
pub enum SkillsmpError {
    /// No API key in the environment or in `~/.env`
    #[error("SKILLSMP_API_KEY not set. Export it or add it to ~/.env.")]
    MissingCredential,

    /// A flag value or flag combination was rejected
    #[error("{0}")]
    Config(String),

    /// The request never produced an HTTP response (DNS, connect, timeout, body read)
    #[error("network error")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was not valid JSON, or not a JSON object
    #[error("could not parse API response")]
    ResponseParse(#[from] serde_json::Error),
}

impl SkillsmpError {
    /// Build a [`SkillsmpError::Config`] from any displayable message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Process exit code for this error category.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::MissingCredential => 3,
            Self::Network(_) => 4,
            Self::Api { .. } => 5,
            Self::ResponseParse(_) => 6,
        }
    }

    /// Whether the error stems from how the tool was invoked.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Result type for SkillsMP operations.
pub type SkillsmpResult<T> = Result<T, SkillsmpError>;
