//! HTTP Endpoints
//!
//! REST API for the survey interview. Paths are kept exactly as the deployed
//! frontend calls them.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::answer::submit_answer;
use crate::export::generate_csv;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.config.server.cors_origins,
        state.config.server.cors_enabled,
    );
    let media_dir = state.config.storage.media_dir.clone();

    Router::new()
        .route("/", get(root_info))
        // Catalog and session lifecycle
        .route("/get-questions", get(get_questions))
        .route("/start-interview", post(start_interview))
        .route("/complete-interview/:session_id", post(complete_interview))
        .route("/get-interview/:session_id", get(get_interview))
        // One answer turn: audio in, next-question decision out
        .route("/stt", post(submit_answer))
        // Speech synthesis
        .route("/tts", post(synthesize))
        // Export
        .route("/generate-csv/:session_id", post(generate_csv))
        // Stored answer audio
        .nest_service("/media", ServeDir::new(media_dir))
        // Health and metrics
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000 for safety
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::info!("No CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    // Wildcard headers cannot be combined with credentials
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Service banner with the route list
async fn root_info(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Urdu Interview API is running",
        "total_questions": state.catalog.len(),
        "endpoints": [
            "/get-questions",
            "/start-interview",
            "/tts",
            "/stt",
            "/complete-interview",
            "/get-interview/{session_id}",
            "/generate-csv/{session_id}",
        ],
    }))
}

/// Get all interview questions
async fn get_questions(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "questions": state.catalog.questions(),
        "total": state.catalog.len(),
    }))
}

/// Start-interview request
#[derive(Debug, Deserialize)]
struct InterviewStart {
    session_id: String,
}

/// Start-interview response
#[derive(Debug, Serialize)]
struct InterviewStarted {
    success: bool,
    session_id: String,
    total_questions: usize,
    message: &'static str,
}

/// Create the interview session row
async fn start_interview(
    State(state): State<AppState>,
    Json(request): Json<InterviewStart>,
) -> Result<Json<InterviewStarted>, ServerError> {
    if request.session_id.trim().is_empty() {
        return Err(ServerError::MissingField("session_id"));
    }

    state
        .store
        .create(&request.session_id, state.catalog.len() as u32)
        .await?;

    Ok(Json(InterviewStarted {
        success: true,
        session_id: request.session_id,
        total_questions: state.catalog.len(),
        message: "Interview session created",
    }))
}

#[derive(Debug, Deserialize)]
struct TtsQuery {
    text: Option<String>,
}

/// Synthesize Urdu text, primary voice with fallback
async fn synthesize(
    State(state): State<AppState>,
    Query(query): Query<TtsQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let text = query.text.unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ServerError::MissingField("text"));
    }

    let audio = state.tts.synthesize(&text).await.map_err(|e| {
        crate::metrics::record_upstream_failure("tts");
        ServerError::from(e)
    })?;

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio))
}

/// Mark interview as completed, exactly once
async fn complete_interview(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    state.store.complete(&session_id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Interview completed successfully",
    })))
}

/// Retrieve full summary of an interview session
async fn get_interview(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let interview = state
        .store
        .get(&session_id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Interview session {session_id}")))?;

    let responses = state.store.responses(&session_id).await?;

    Ok(Json(serde_json::json!({
        "interview": interview,
        "responses": responses,
    })))
}

/// Liveness check with a dependency summary
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "checks": {
                "catalog": { "status": "ok", "questions": state.catalog.len() },
                "sessions": {
                    "status": "ok",
                    "distributed": state.is_distributed_sessions(),
                },
                "tts": { "provider": state.tts.name() },
            },
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use survey_agent_core::Classification;

    #[test]
    fn test_router_creation() {
        let state = testing::state(Some("جواب"), Some(Classification::valid()));
        let _ = create_router(state);
    }

    #[tokio::test]
    async fn test_start_interview_requires_session_id() {
        let state = testing::state(Some("جواب"), Some(Classification::valid()));
        let err = start_interview(
            State(state),
            Json(InterviewStart {
                session_id: "  ".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_start_then_fetch_interview() {
        let state = testing::state(Some("جواب"), Some(Classification::valid()));
        let started = start_interview(
            State(state.clone()),
            Json(InterviewStart {
                session_id: "abc".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(started.0.total_questions, 8);

        let fetched = get_interview(State(state), Path("abc".into())).await.unwrap();
        assert_eq!(fetched.0["interview"]["status"], "in_progress");
    }

    #[tokio::test]
    async fn test_unknown_interview_is_404() {
        let state = testing::state(Some("جواب"), Some(Classification::valid()));
        let err = get_interview(State(state), Path("ghost".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_double_complete_is_404() {
        let state = testing::state(Some("جواب"), Some(Classification::valid()));
        start_interview(
            State(state.clone()),
            Json(InterviewStart {
                session_id: "abc".into(),
            }),
        )
        .await
        .unwrap();

        complete_interview(State(state.clone()), Path("abc".into()))
            .await
            .unwrap();
        let err = complete_interview(State(state), Path("abc".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tts_requires_text() {
        let state = testing::state(Some("جواب"), Some(Classification::valid()));
        let err = synthesize(State(state), Query(TtsQuery { text: None }))
            .await
            .err()
            .unwrap();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
