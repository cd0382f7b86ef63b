//! Azure neural TTS client
//!
//! Primary synthesis provider. Speaks through the `ur-PK-UzmaNeural` voice by
//! default, the same voice the interview has always used.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use survey_agent_core::TextToSpeech;

use crate::SpeechError;

/// Configuration for the Azure TTS backend
#[derive(Debug, Clone)]
pub struct AzureTtsConfig {
    /// API key (from AZURE_SPEECH_KEY or direct)
    pub api_key: String,
    /// Synthesis endpoint (derived from the region by default)
    pub endpoint: String,
    /// Neural voice name
    pub voice: String,
    /// Request timeout
    pub timeout: Duration,
}

impl AzureTtsConfig {
    pub fn for_region(region: &str) -> Self {
        Self {
            api_key: std::env::var("AZURE_SPEECH_KEY").unwrap_or_default(),
            endpoint: format!("https://{region}.tts.speech.microsoft.com"),
            voice: "ur-PK-UzmaNeural".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&survey_agent_config::SpeechConfig> for AzureTtsConfig {
    fn from(config: &survey_agent_config::SpeechConfig) -> Self {
        Self {
            api_key: config.azure_api_key.clone(),
            endpoint: format!("https://{}.tts.speech.microsoft.com", config.azure_region),
            voice: config.tts_voice.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

/// Azure Cognitive Services TTS client
pub struct AzureTts {
    config: AzureTtsConfig,
    client: Client,
}

impl AzureTts {
    pub fn new(config: AzureTtsConfig) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SpeechError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    async fn request_audio(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        if self.config.api_key.is_empty() {
            return Err(SpeechError::Configuration(
                "AZURE_SPEECH_KEY not set".to_string(),
            ));
        }

        let body = ssml(&self.config.voice, text);

        let response = self
            .client
            .post(format!("{}/cognitiveservices/v1", self.config.endpoint))
            .header("Ocp-Apim-Subscription-Key", &self.config.api_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", "audio-24khz-48kbitrate-mono-mp3")
            .header("User-Agent", "survey-agent")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SpeechError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let audio = response.bytes().await?.to_vec();
        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        Ok(audio)
    }
}

#[async_trait]
impl TextToSpeech for AzureTts {
    fn name(&self) -> &'static str {
        "azure"
    }

    async fn synthesize(&self, text: &str) -> survey_agent_core::Result<Vec<u8>> {
        let audio = self
            .request_audio(text)
            .await
            .map_err(|e| survey_agent_core::Error::Synthesis(e.to_string()))?;

        tracing::debug!(voice = %self.config.voice, bytes = audio.len(), "Azure TTS success");
        Ok(audio)
    }
}

/// Build the SSML envelope for one utterance.
fn ssml(voice: &str, text: &str) -> String {
    format!(
        r#"<speak version='1.0' xml:lang='ur-PK'><voice name='{voice}'>{}</voice></speak>"#,
        escape_xml(text)
    )
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
