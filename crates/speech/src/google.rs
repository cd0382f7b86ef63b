//! Google Translate TTS client
//!
//! Fallback synthesis provider. The translate endpoint only accepts short
//! inputs, so longer question text is split on sentence boundaries and the
//! MP3 segments are concatenated — MP3 frames are self-contained, the result
//! plays as one utterance.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use survey_agent_core::TextToSpeech;

use crate::SpeechError;

/// Longest chunk the translate endpoint reliably accepts.
const MAX_CHUNK_CHARS: usize = 200;

/// Google Translate TTS client
pub struct GoogleTranslateTts {
    endpoint: String,
    language: String,
    client: Client,
}

impl GoogleTranslateTts {
    pub fn new(language: impl Into<String>) -> Result<Self, SpeechError> {
        Self::with_endpoint("https://translate.google.com", language)
    }

    pub fn with_endpoint(
        endpoint: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SpeechError::Network(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into(),
            language: language.into(),
            client,
        })
    }

    async fn fetch_chunk(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let response = self
            .client
            .get(format!("{}/translate_tts", self.endpoint))
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.language.as_str()),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Api(format!("HTTP {}", status)));
        }

        let audio = response.bytes().await?.to_vec();
        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        Ok(audio)
    }
}

#[async_trait]
impl TextToSpeech for GoogleTranslateTts {
    fn name(&self) -> &'static str {
        "google-translate"
    }

    async fn synthesize(&self, text: &str) -> survey_agent_core::Result<Vec<u8>> {
        let mut audio = Vec::new();
        for chunk in split_text(text, MAX_CHUNK_CHARS) {
            let bytes = self
                .fetch_chunk(&chunk)
                .await
                .map_err(|e| survey_agent_core::Error::Synthesis(e.to_string()))?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(survey_agent_core::Error::Synthesis(
                "nothing to synthesize".to_string(),
            ));
        }

        tracing::debug!(bytes = audio.len(), "Google Translate TTS success");
        Ok(audio)
    }
}

/// Split text into chunks of at most `max_chars` characters, preferring
/// sentence boundaries, then whitespace.
fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for sentence in split_inclusive_on(text, &['۔', '؟', '.', '!', '?']) {
        let sentence_chars = sentence.chars().count();

        if current_chars + sentence_chars > max_chars && !current.is_empty() {
            chunks.push(current.trim().to_string());
            current = String::new();
            current_chars = 0;
        }

        if sentence_chars > max_chars {
            // A single run-on sentence; fall back to word boundaries
            for word in sentence.split_whitespace() {
                let word_chars = word.chars().count() + 1;
                if current_chars + word_chars > max_chars && !current.is_empty() {
                    chunks.push(current.trim().to_string());
                    current = String::new();
                    current_chars = 0;
                }
                current.push_str(word);
                current.push(' ');
                current_chars += word_chars;
            }
        } else {
            current.push_str(sentence);
            current_chars += sentence_chars;
        }
    }

    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }

    chunks
}

/// Like `split_inclusive` over a set of terminator characters.
fn split_inclusive_on<'a>(text: &'a str, terminators: &'a [char]) -> impl Iterator<Item = &'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        if terminators.contains(&c) {
            let end = idx + c.len_utf8();
            pieces.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces.into_iter()
}
