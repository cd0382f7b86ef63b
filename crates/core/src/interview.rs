//! Interview session and response records

use crate::question::{QuestionId, QuestionKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle of an interview session.
///
/// The only legal transition is `InProgress -> Completed`, taken exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    InProgress,
    Completed,
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for InterviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown interview status: {other}")),
        }
    }
}

/// One interview session, created at start and completed at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    pub session_id: String,
    pub total_questions: u32,
    pub status: InterviewStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl InterviewSession {
    pub fn new(session_id: impl Into<String>, total_questions: u32) -> Self {
        Self {
            session_id: session_id.into(),
            total_questions,
            status: InterviewStatus::InProgress,
            started_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// One accepted/observed answer, immutable after creation.
///
/// Field names on the wire match the deployed frontend's payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub session_id: String,
    pub question_id: QuestionId,
    pub question_text: String,
    #[serde(rename = "question_type")]
    pub question_kind: QuestionKind,
    pub answer_text: String,
    /// Seconds the transcription call took, rounded to two decimals.
    pub transcription_time: f64,
    #[serde(rename = "audio_file_url")]
    pub audio_url: String,
    pub response_order: u32,
    pub recorded_at: DateTime<Utc>,
}
