//! Survey Agent Server Entry Point

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use survey_agent_config::{load_catalog, load_settings, Settings};
use survey_agent_core::{QuestionCatalog, TextToSpeech};
use survey_agent_llm::{GroqClassifier, GroqConfig};
use survey_agent_persistence::{
    InMemoryInterviewStore, InterviewStore, LocalAudioStore, ScyllaConfig,
};
use survey_agent_server::{create_router, init_metrics, AppState};
use survey_agent_speech::{AzureTts, AzureTtsConfig, DeepgramConfig, DeepgramStt, FallbackTts, GoogleTranslateTts};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from files and environment
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("SURVEY_AGENT_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => {
            // Tracing not yet initialized, use eprintln for early logging
            eprintln!(
                "Loaded configuration from files (env: {})",
                env.as_deref().unwrap_or("default")
            );
            settings
        }
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&config);

    tracing::info!("Starting Survey Agent Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?config.environment,
        config_path = env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    // Question catalog is the source of truth for the interview flow
    let catalog = load_question_catalog(&config);
    tracing::info!(questions = catalog.len(), "Question catalog loaded");

    // Initialize Prometheus metrics
    if let Err(e) = init_metrics() {
        tracing::warn!("Failed to initialize metrics: {}", e);
    } else {
        tracing::info!("Initialized Prometheus metrics at /metrics");
    }

    // Provider clients: constructed once, injected everywhere
    let stt = match DeepgramStt::new(DeepgramConfig::from(&config.speech)) {
        Ok(stt) => Arc::new(stt),
        Err(e) => {
            tracing::error!(
                "Failed to initialize Deepgram STT: {}. \
                 Set DEEPGRAM_API_KEY and restart.",
                e
            );
            std::process::exit(1);
        }
    };

    let tts: Arc<dyn TextToSpeech> = Arc::new(FallbackTts::new(
        Box::new(AzureTts::new(AzureTtsConfig::from(&config.speech))?),
        Box::new(GoogleTranslateTts::new(config.speech.language.clone())?),
    ));

    let classifier = match GroqClassifier::new(GroqConfig::from(&config.llm)) {
        Ok(classifier) => Arc::new(classifier),
        Err(e) => {
            tracing::error!(
                "Failed to initialize answer classifier: {}. \
                 Set GROQ_API_KEY and restart.",
                e
            );
            std::process::exit(1);
        }
    };

    // Optionally initialize ScyllaDB persistence
    let store: Arc<dyn InterviewStore> = if config.persistence.enabled {
        tracing::info!("Initializing ScyllaDB persistence layer...");
        let scylla_config = ScyllaConfig {
            hosts: config.persistence.scylla_hosts.clone(),
            keyspace: config.persistence.keyspace.clone(),
            replication_factor: config.persistence.replication_factor,
        };
        match survey_agent_persistence::init(scylla_config).await {
            Ok(store) => {
                tracing::info!(
                    hosts = ?config.persistence.scylla_hosts,
                    keyspace = %config.persistence.keyspace,
                    "ScyllaDB persistence initialized"
                );
                Arc::new(store)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to initialize ScyllaDB: {}. Falling back to in-memory.",
                    e
                );
                Arc::new(InMemoryInterviewStore::new())
            }
        }
    } else {
        tracing::info!("Persistence disabled, using in-memory session store");
        Arc::new(InMemoryInterviewStore::new())
    };

    let audio = Arc::new(LocalAudioStore::new(
        &config.storage.media_dir,
        &config.storage.public_base_url,
    ));

    let host = config.server.host.clone();
    let port = config.server.port;

    let state = AppState::new(config, catalog, stt, tts, classifier, store, audio);
    tracing::info!(
        distributed = state.is_distributed_sessions(),
        "Initialized application state"
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    tracing::info!("Listening on {}:{}", host, port);

    // Graceful shutdown on SIGTERM/SIGINT
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

/// Initialize tracing (console, optionally JSON)
fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("survey_agent={},tower_http=debug", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    subscriber.with(fmt_layer).init();
}

/// Load the question catalog, exiting on an invalid file.
///
/// A missing file falls back to the built-in survey; a present-but-broken
/// one is fatal.
fn load_question_catalog(config: &Settings) -> QuestionCatalog {
    match load_catalog(&config.catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(
                path = %config.catalog_path,
                error = %e,
                "Failed to load question catalog. Fix the file and restart."
            );
            std::process::exit(1);
        }
    }
}
