//! Primary/secondary TTS fallback
//!
//! The interview keeps speaking even when the primary voice is down: one
//! attempt on the primary, one on the secondary, then the failure is
//! reported. This is the only fallback path in the system.

use async_trait::async_trait;

use survey_agent_core::TextToSpeech;

/// Text-to-speech with a single fallback provider.
pub struct FallbackTts {
    primary: Box<dyn TextToSpeech>,
    secondary: Box<dyn TextToSpeech>,
}

impl FallbackTts {
    pub fn new(primary: Box<dyn TextToSpeech>, secondary: Box<dyn TextToSpeech>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl TextToSpeech for FallbackTts {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn synthesize(&self, text: &str) -> survey_agent_core::Result<Vec<u8>> {
        let primary_err = match self.primary.synthesize(text).await {
            Ok(audio) => return Ok(audio),
            Err(e) => e,
        };

        tracing::warn!(
            primary = self.primary.name(),
            secondary = self.secondary.name(),
            error = %primary_err,
            "Primary TTS failed, trying fallback"
        );

        match self.secondary.synthesize(text).await {
            Ok(audio) => Ok(audio),
            Err(secondary_err) => {
                tracing::error!(
                    primary = self.primary.name(),
                    secondary = self.secondary.name(),
                    primary_error = %primary_err,
                    secondary_error = %secondary_err,
                    "Both TTS providers failed"
                );
                Err(survey_agent_core::Error::Synthesis(format!(
                    "both providers failed: {} ({}); {} ({})",
                    self.primary.name(),
                    primary_err,
                    self.secondary.name(),
                    secondary_err
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_agent_core::Error;

    struct StaticTts {
        name: &'static str,
        audio: Option<Vec<u8>>,
    }

    #[async_trait]
    impl TextToSpeech for StaticTts {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn synthesize(&self, _text: &str) -> survey_agent_core::Result<Vec<u8>> {
            self.audio
                .clone()
                .ok_or_else(|| Error::Synthesis(format!("{} is down", self.name)))
        }
    }

    fn working(name: &'static str, byte: u8) -> Box<dyn TextToSpeech> {
        Box::new(StaticTts {
            name,
            audio: Some(vec![byte; 4]),
        })
    }

    fn broken(name: &'static str) -> Box<dyn TextToSpeech> {
        Box::new(StaticTts { name, audio: None })
    }

    #[tokio::test]
    async fn test_primary_wins_when_healthy() {
        let tts = FallbackTts::new(working("primary", 1), working("secondary", 2));
        assert_eq!(tts.synthesize("سلام").await.unwrap(), vec![1; 4]);
    }

    #[tokio::test]
    async fn test_falls_back_when_primary_fails() {
        let tts = FallbackTts::new(broken("primary"), working("secondary", 2));
        assert_eq!(tts.synthesize("سلام").await.unwrap(), vec![2; 4]);
    }

    #[tokio::test]
    async fn test_reports_failure_when_both_fail() {
        let tts = FallbackTts::new(broken("primary"), broken("secondary"));
        let err = tts.synthesize("سلام").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("primary"));
        assert!(message.contains("secondary"));
    }
}
