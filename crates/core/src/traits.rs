//! Provider traits
//!
//! External speech and language services are consumed through these traits.
//! Implementations live in their own crates and are constructed once at
//! startup, then injected into the server state behind `Arc<dyn ...>`.

use crate::classification::Classification;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Outcome of transcribing one audio clip.
#[derive(Debug, Clone)]
pub struct Transcription {
    pub text: String,
    /// Wall-clock time the provider call took.
    pub elapsed: Duration,
}

/// Speech-to-text provider contract.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe a complete audio clip. Fails if the provider returns no
    /// usable transcript.
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcription>;
}

/// Text-to-speech provider contract.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Provider name, used in logs when a fallback engages.
    fn name(&self) -> &'static str;

    /// Synthesize Urdu text into audio bytes (MP3).
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// LLM-backed answer classifier contract.
///
/// Implementations must always produce a `Classification`; upstream output
/// that cannot be parsed maps to the `error` category rather than failing.
/// Only transport-level faults surface as `Err`.
#[async_trait]
pub trait AnswerClassifier: Send + Sync {
    async fn classify(&self, question: &str, answer: &str) -> Result<Classification>;
}
