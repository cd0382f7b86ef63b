//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Runtime environment enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Speech provider configuration (STT + TTS)
    #[serde(default)]
    pub speech: SpeechConfig,

    /// LLM classifier configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Audio file storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Persistence configuration (ScyllaDB)
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Path to the question catalog file (YAML)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
}

fn default_catalog_path() -> String {
    "config/questions.yaml".to_string()
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS origin checks (false = permissive, development only)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Speech provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Deepgram API key (DEEPGRAM_API_KEY)
    #[serde(default = "default_deepgram_api_key")]
    pub deepgram_api_key: String,

    /// Deepgram API endpoint (override for testing)
    #[serde(default = "default_deepgram_endpoint")]
    pub deepgram_endpoint: String,

    /// STT model
    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    /// Interview language code
    #[serde(default = "default_language")]
    pub language: String,

    /// Azure Speech API key (AZURE_SPEECH_KEY)
    #[serde(default = "default_azure_api_key")]
    pub azure_api_key: String,

    /// Azure Speech region
    #[serde(default = "default_azure_region")]
    pub azure_region: String,

    /// Neural voice used for question synthesis
    #[serde(default = "default_tts_voice")]
    pub tts_voice: String,

    /// Per-request timeout for provider calls
    #[serde(default = "default_speech_timeout")]
    pub timeout_seconds: u64,
}

fn default_deepgram_api_key() -> String {
    std::env::var("DEEPGRAM_API_KEY").unwrap_or_default()
}

fn default_deepgram_endpoint() -> String {
    "https://api.deepgram.com".to_string()
}

fn default_stt_model() -> String {
    "whisper-large".to_string()
}

fn default_language() -> String {
    "ur".to_string()
}

fn default_azure_api_key() -> String {
    std::env::var("AZURE_SPEECH_KEY").unwrap_or_default()
}

fn default_azure_region() -> String {
    "centralindia".to_string()
}

fn default_tts_voice() -> String {
    "ur-PK-UzmaNeural".to_string()
}

fn default_speech_timeout() -> u64 {
    30
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            deepgram_api_key: default_deepgram_api_key(),
            deepgram_endpoint: default_deepgram_endpoint(),
            stt_model: default_stt_model(),
            language: default_language(),
            azure_api_key: default_azure_api_key(),
            azure_region: default_azure_region(),
            tts_voice: default_tts_voice(),
            timeout_seconds: default_speech_timeout(),
        }
    }
}

/// LLM classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible endpoint base
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// API key (GROQ_API_KEY)
    #[serde(default = "default_llm_api_key")]
    pub api_key: String,

    /// Model identifier
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,

    /// Maximum tokens in the classification reply
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,
}

fn default_llm_endpoint() -> String {
    "https://api.groq.com/openai".to_string()
}

fn default_llm_api_key() -> String {
    std::env::var("GROQ_API_KEY").unwrap_or_default()
}

fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_llm_temperature() -> f32 {
    0.2
}

fn default_llm_max_tokens() -> u32 {
    256
}

fn default_llm_timeout() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: default_llm_api_key(),
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            max_tokens: default_llm_max_tokens(),
            timeout_seconds: default_llm_timeout(),
        }
    }
}

/// Audio file storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory answer audio is written under
    #[serde(default = "default_media_dir")]
    pub media_dir: String,

    /// Base URL prefixed onto stored-audio paths
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

fn default_media_dir() -> String {
    "media".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            media_dir: default_media_dir(),
            public_base_url: default_public_base_url(),
        }
    }
}

/// Persistence configuration for ScyllaDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Enable ScyllaDB persistence (false = in-memory only)
    #[serde(default)]
    pub enabled: bool,

    /// ScyllaDB host addresses
    #[serde(default = "default_scylla_hosts")]
    pub scylla_hosts: Vec<String>,

    /// ScyllaDB keyspace name
    #[serde(default = "default_scylla_keyspace")]
    pub keyspace: String,

    /// ScyllaDB replication factor
    #[serde(default = "default_replication_factor")]
    pub replication_factor: u8,
}

fn default_scylla_hosts() -> Vec<String> {
    std::env::var("SCYLLA_HOSTS")
        .map(|s| s.split(',').map(|h| h.trim().to_string()).collect())
        .unwrap_or_else(|_| vec!["127.0.0.1:9042".to_string()])
}

fn default_scylla_keyspace() -> String {
    std::env::var("SCYLLA_KEYSPACE").unwrap_or_else(|_| "urdu_survey".to_string())
}

fn default_replication_factor() -> u8 {
    1
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scylla_hosts: default_scylla_hosts(),
            keyspace: default_scylla_keyspace(),
            replication_factor: default_replication_factor(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level for the survey_agent targets
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_llm()?;
        self.validate_speech()?;
        self.validate_storage()?;
        self.validate_persistence()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if self.environment.is_production() && self.server.cors_enabled
            && self.server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 This may block legitimate requests."
            );
        }

        Ok(())
    }

    fn validate_llm(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", self.llm.temperature),
            });
        }

        if self.llm.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.max_tokens".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if self.llm.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        // Missing keys are fatal only where the call would actually be made
        if self.environment.is_strict() && self.llm.api_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "llm.api_key".to_string(),
                message: "GROQ_API_KEY must be set outside development".to_string(),
            });
        }

        Ok(())
    }

    fn validate_speech(&self) -> Result<(), ConfigError> {
        if self.speech.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "speech.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        if self.environment.is_strict() && self.speech.deepgram_api_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "speech.deepgram_api_key".to_string(),
                message: "DEEPGRAM_API_KEY must be set outside development".to_string(),
            });
        }

        if self.environment.is_strict() && self.speech.azure_api_key.is_empty() {
            tracing::warn!(
                "AZURE_SPEECH_KEY is not set; synthesis will rely on the fallback provider"
            );
        }

        Ok(())
    }

    fn validate_storage(&self) -> Result<(), ConfigError> {
        if self.storage.media_dir.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.media_dir".to_string(),
                message: "Media directory cannot be empty".to_string(),
            });
        }

        if self.storage.public_base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.public_base_url".to_string(),
                message: "Public base URL cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    fn validate_persistence(&self) -> Result<(), ConfigError> {
        if self.persistence.enabled {
            if self.persistence.scylla_hosts.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "persistence.scylla_hosts".to_string(),
                    message: "At least one host is required when persistence is enabled"
                        .to_string(),
                });
            }

            if self.persistence.replication_factor == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "persistence.replication_factor".to_string(),
                    message: "Replication factor must be at least 1".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Load settings from config files and environment
///
/// Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::with_name("config/default").required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("SURVEY_AGENT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    // Validate
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.speech.language, "ur");
        assert_eq!(settings.speech.tts_voice, "ur-PK-UzmaNeural");
        assert!(!settings.persistence.enabled);
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());

        settings.server.port = 8080;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_llm_temperature_validation() {
        let mut settings = Settings::default();
        settings.llm.temperature = 3.0;
        assert!(settings.validate().is_err());

        settings.llm.temperature = 0.0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_persistence_validation_only_when_enabled() {
        let mut settings = Settings::default();
        settings.persistence.scylla_hosts.clear();
        assert!(settings.validate().is_ok());

        settings.persistence.enabled = true;
        assert!(settings.validate().is_err());
    }
}
