//! LLM integration for answer classification
//!
//! One job: label a respondent's answer against the question that was asked.
//! The Groq chat-completions API does the labelling; this crate owns the
//! prompt, the client, and the lenient parsing of whatever comes back.

pub mod classifier;
pub mod groq;

pub use classifier::{GroqClassifier, CLASSIFIER_RETRY_MESSAGE};
pub use groq::{GroqClient, GroqConfig};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

impl From<LlmError> for survey_agent_core::Error {
    fn from(err: LlmError) -> Self {
        survey_agent_core::Error::Classification(err.to_string())
    }
}
