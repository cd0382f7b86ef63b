//! Application State
//!
//! Shared state across all handlers. Every external collaborator is an
//! explicitly constructed, injected client object behind a trait; nothing
//! here is a global.

use std::sync::Arc;

use survey_agent_config::Settings;
use survey_agent_core::{AnswerClassifier, QuestionCatalog, SpeechToText, TextToSpeech};
use survey_agent_persistence::{AudioStore, InterviewStore};

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration, loaded once at startup
    pub config: Arc<Settings>,
    /// Question catalog, the source of truth for current-question state
    pub catalog: Arc<QuestionCatalog>,
    /// Speech-to-text provider
    pub stt: Arc<dyn SpeechToText>,
    /// Text-to-speech provider (primary + fallback pair)
    pub tts: Arc<dyn TextToSpeech>,
    /// LLM answer classifier
    pub classifier: Arc<dyn AnswerClassifier>,
    /// Interview session and response store
    pub store: Arc<dyn InterviewStore>,
    /// Answer audio storage
    pub audio: Arc<dyn AudioStore>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Settings,
        catalog: QuestionCatalog,
        stt: Arc<dyn SpeechToText>,
        tts: Arc<dyn TextToSpeech>,
        classifier: Arc<dyn AnswerClassifier>,
        store: Arc<dyn InterviewStore>,
        audio: Arc<dyn AudioStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            stt,
            tts,
            classifier,
            store,
            audio,
        }
    }

    /// Whether sessions survive a restart.
    pub fn is_distributed_sessions(&self) -> bool {
        self.store.is_distributed()
    }
}
