//! Deepgram pre-recorded transcription client

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use survey_agent_core::{SpeechToText, Transcription};

use crate::SpeechError;

/// Configuration for the Deepgram backend
#[derive(Debug, Clone)]
pub struct DeepgramConfig {
    /// API key (from DEEPGRAM_API_KEY or direct)
    pub api_key: String,
    /// API endpoint base (for testing or proxy)
    pub endpoint: String,
    /// Transcription model
    pub model: String,
    /// Language code
    pub language: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for DeepgramConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("DEEPGRAM_API_KEY").unwrap_or_default(),
            endpoint: "https://api.deepgram.com".to_string(),
            model: "whisper-large".to_string(),
            language: "ur".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&survey_agent_config::SpeechConfig> for DeepgramConfig {
    fn from(config: &survey_agent_config::SpeechConfig) -> Self {
        Self {
            api_key: config.deepgram_api_key.clone(),
            endpoint: config.deepgram_endpoint.clone(),
            model: config.stt_model.clone(),
            language: config.language.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

/// Deepgram speech-to-text client
pub struct DeepgramStt {
    config: DeepgramConfig,
    client: Client,
}

impl DeepgramStt {
    pub fn new(config: DeepgramConfig) -> Result<Self, SpeechError> {
        if config.api_key.is_empty() {
            return Err(SpeechError::Configuration(
                "DEEPGRAM_API_KEY not set. Set it via environment or config.".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SpeechError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    async fn listen(&self, audio: &[u8]) -> Result<String, SpeechError> {
        let response = self
            .client
            .post(format!("{}/v1/listen", self.config.endpoint))
            .query(&[
                ("model", self.config.model.as_str()),
                ("language", self.config.language.as_str()),
                ("smart_format", "true"),
            ])
            .header("Authorization", format!("Token {}", self.config.api_key))
            .header("Content-Type", "audio/wav")
            .body(audio.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SpeechError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let response: ListenResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(e.to_string()))?;

        extract_transcript(response)
    }
}

fn extract_transcript(response: ListenResponse) -> Result<String, SpeechError> {
    let transcript = response
        .results
        .and_then(|r| r.channels.into_iter().next())
        .and_then(|c| c.alternatives.into_iter().next())
        .map(|a| a.transcript)
        .ok_or(SpeechError::EmptyTranscript)?;

    if transcript.trim().is_empty() {
        return Err(SpeechError::EmptyTranscript);
    }

    Ok(transcript)
}

#[async_trait]
impl SpeechToText for DeepgramStt {
    async fn transcribe(&self, audio: &[u8]) -> survey_agent_core::Result<Transcription> {
        let start = Instant::now();
        let text = self
            .listen(audio)
            .await
            .map_err(|e| survey_agent_core::Error::Transcription(e.to_string()))?;
        let elapsed = start.elapsed();

        tracing::info!(
            model = %self.config.model,
            elapsed_ms = elapsed.as_millis() as u64,
            chars = text.chars().count(),
            "Transcription complete"
        );

        Ok(Transcription { text, elapsed })
    }
}

// =============================================================================
// Deepgram API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ListenResponse {
    results: Option<ListenResults>,
}

#[derive(Debug, Deserialize)]
struct ListenResults {
    #[serde(default)]
    channels: Vec<ListenChannel>,
}

#[derive(Debug, Deserialize)]
struct ListenChannel {
    #[serde(default)]
    alternatives: Vec<ListenAlternative>,
}

#[derive(Debug, Deserialize)]
struct ListenAlternative {
    transcript: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_is_rejected() {
        let config = DeepgramConfig {
            api_key: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            DeepgramStt::new(config),
            Err(SpeechError::Configuration(_))
        ));
    }

    #[test]
    fn test_transcript_extraction() {
        let json = r#"{
            "results": {
                "channels": [
                    {"alternatives": [{"transcript": "مجھے بہت پسند آیا", "confidence": 0.93}]}
                ]
            }
        }"#;
        let response: ListenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_transcript(response).unwrap(), "مجھے بہت پسند آیا");
    }

    #[test]
    fn test_missing_results_is_empty_transcript() {
        let response: ListenResponse = serde_json::from_str(r#"{"results": null}"#).unwrap();
        assert!(matches!(
            extract_transcript(response),
            Err(SpeechError::EmptyTranscript)
        ));
    }

    #[test]
    fn test_blank_transcript_is_empty_transcript() {
        let json = r#"{
            "results": {"channels": [{"alternatives": [{"transcript": "   "}]}]}
        }"#;
        let response: ListenResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            extract_transcript(response),
            Err(SpeechError::EmptyTranscript)
        ));
    }
}
