//! Speech provider clients
//!
//! Thin HTTP clients for the external speech services:
//! - Deepgram pre-recorded transcription (Urdu)
//! - Azure neural TTS as the primary synthesis voice
//! - Google Translate TTS as the synthesis fallback
//!
//! Each client is constructed once at startup and injected behind the
//! [`survey_agent_core::SpeechToText`] / [`survey_agent_core::TextToSpeech`]
//! traits. No retries happen here; the only second chance anywhere is the
//! TTS fallback pair.

pub mod azure;
pub mod deepgram;
pub mod fallback;
pub mod google;

pub use azure::{AzureTts, AzureTtsConfig};
pub use deepgram::{DeepgramConfig, DeepgramStt};
pub use fallback::FallbackTts;
pub use google::GoogleTranslateTts;

use thiserror::Error;

/// Speech provider errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No usable transcript in response")]
    EmptyTranscript,

    #[error("Provider returned no audio")]
    EmptyAudio,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        SpeechError::Network(err.to_string())
    }
}
