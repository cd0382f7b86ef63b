//! Survey Agent Server
//!
//! HTTP surface of the Urdu interview agent. Routes mirror the deployed
//! service: fetch the catalog, start a session, submit one answer, synthesize
//! speech, mark a session complete, fetch the transcript, export to CSV.

pub mod answer;
pub mod export;
pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, record_answer_turn, record_upstream_failure};
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Server errors
///
/// Status mapping follows the deployed API: 400 for missing or malformed
/// identifiers, 404 for unknown sessions, 500 for upstream service failures.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Missing identifier: {0}")]
    MissingField(&'static str),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service failure: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingField(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<survey_agent_core::Error> for ServerError {
    fn from(err: survey_agent_core::Error) -> Self {
        use survey_agent_core::Error;
        match err {
            Error::NotFound(msg) => ServerError::NotFound(msg),
            Error::InvalidInput(msg) => ServerError::InvalidRequest(msg),
            other => ServerError::Upstream(other.to_string()),
        }
    }
}

impl From<survey_agent_persistence::PersistenceError> for ServerError {
    fn from(err: survey_agent_persistence::PersistenceError) -> Self {
        use survey_agent_persistence::PersistenceError;
        match err {
            PersistenceError::NotFound(_) | PersistenceError::AlreadyCompleted(_) => {
                ServerError::NotFound(err.to_string())
            }
            PersistenceError::AlreadyExists(_)
            | PersistenceError::NonMonotonicOrder { .. }
            | PersistenceError::InvalidData(_) => ServerError::InvalidRequest(err.to_string()),
            other => ServerError::Upstream(other.to_string()),
        }
    }
}

impl From<survey_agent_flow::FlowError> for ServerError {
    fn from(err: survey_agent_flow::FlowError) -> Self {
        ServerError::InvalidRequest(err.to_string())
    }
}
