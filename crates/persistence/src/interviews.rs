//! Interview session and response stores
//!
//! The store owns the session lifecycle invariant: a session is created
//! `in_progress`, flips to `completed` exactly once, and response order only
//! ever grows within a session. Completing an unknown or already-completed
//! session is an error, never a silent success.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

use survey_agent_core::{InterviewSession, InterviewStatus, QuestionId, ResponseRecord};

use crate::client::ScyllaClient;
use crate::error::PersistenceError;

/// Store trait for interview sessions and their responses.
#[async_trait]
pub trait InterviewStore: Send + Sync {
    /// Create a new in-progress session.
    async fn create(
        &self,
        session_id: &str,
        total_questions: u32,
    ) -> Result<InterviewSession, PersistenceError>;

    /// Fetch a session by id.
    async fn get(&self, session_id: &str) -> Result<Option<InterviewSession>, PersistenceError>;

    /// Flip a session to completed, exactly once.
    async fn complete(&self, session_id: &str) -> Result<InterviewSession, PersistenceError>;

    /// Append one response record to a session.
    async fn append_response(&self, record: &ResponseRecord) -> Result<(), PersistenceError>;

    /// All responses of a session, ordered by response order.
    async fn responses(&self, session_id: &str) -> Result<Vec<ResponseRecord>, PersistenceError>;

    /// Whether sessions survive a server restart (ScyllaDB vs in-memory).
    fn is_distributed(&self) -> bool;
}

// =============================================================================
// ScyllaDB implementation
// =============================================================================

/// ScyllaDB-backed interview store
#[derive(Clone)]
pub struct ScyllaInterviewStore {
    client: ScyllaClient,
}

impl ScyllaInterviewStore {
    pub fn new(client: ScyllaClient) -> Self {
        Self { client }
    }

    async fn last_response_order(
        &self,
        session_id: &str,
    ) -> Result<Option<u32>, PersistenceError> {
        let query = format!(
            "SELECT response_order FROM {}.interview_responses
             WHERE session_id = ? ORDER BY response_order DESC LIMIT 1",
            self.client.keyspace()
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (session_id,))
            .await?;

        if let Some(rows) = result.rows {
            if let Some(row) = rows.into_iter().next() {
                let (order,): (i32,) = row
                    .into_typed()
                    .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;
                return Ok(Some(order as u32));
            }
        }

        Ok(None)
    }
}

#[async_trait]
impl InterviewStore for ScyllaInterviewStore {
    async fn create(
        &self,
        session_id: &str,
        total_questions: u32,
    ) -> Result<InterviewSession, PersistenceError> {
        if self.get(session_id).await?.is_some() {
            return Err(PersistenceError::AlreadyExists(session_id.to_string()));
        }

        let session = InterviewSession::new(session_id, total_questions);

        let query = format!(
            "INSERT INTO {}.interviews (session_id, total_questions, status, started_at, completed_at)
             VALUES (?, ?, ?, ?, ?)",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    session_id,
                    total_questions as i32,
                    session.status.as_str(),
                    session.started_at.timestamp_millis(),
                    None::<i64>,
                ),
            )
            .await?;

        tracing::info!(session_id = %session_id, total_questions, "Interview session created");
        Ok(session)
    }

    async fn get(&self, session_id: &str) -> Result<Option<InterviewSession>, PersistenceError> {
        let query = format!(
            "SELECT session_id, total_questions, status, started_at, completed_at
             FROM {}.interviews WHERE session_id = ?",
            self.client.keyspace()
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (session_id,))
            .await?;

        let Some(rows) = result.rows else {
            return Ok(None);
        };

        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        let (session_id, total_questions, status, started_at, completed_at): (
            String,
            i32,
            String,
            i64,
            Option<i64>,
        ) = row
            .into_typed()
            .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;

        Ok(Some(InterviewSession {
            session_id,
            total_questions: total_questions as u32,
            status: status
                .parse::<InterviewStatus>()
                .map_err(PersistenceError::InvalidData)?,
            started_at: DateTime::from_timestamp_millis(started_at).unwrap_or_else(Utc::now),
            completed_at: completed_at.and_then(DateTime::from_timestamp_millis),
        }))
    }

    async fn complete(&self, session_id: &str) -> Result<InterviewSession, PersistenceError> {
        let mut session = self
            .get(session_id)
            .await?
            .ok_or_else(|| PersistenceError::NotFound(session_id.to_string()))?;

        if session.status == InterviewStatus::Completed {
            return Err(PersistenceError::AlreadyCompleted(session_id.to_string()));
        }

        let completed_at = Utc::now();
        let query = format!(
            "UPDATE {}.interviews SET status = ?, completed_at = ? WHERE session_id = ?",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    InterviewStatus::Completed.as_str(),
                    completed_at.timestamp_millis(),
                    session_id,
                ),
            )
            .await?;

        session.status = InterviewStatus::Completed;
        session.completed_at = Some(completed_at);

        tracing::info!(session_id = %session_id, "Interview completed");
        Ok(session)
    }

    async fn append_response(&self, record: &ResponseRecord) -> Result<(), PersistenceError> {
        if self.get(&record.session_id).await?.is_none() {
            return Err(PersistenceError::NotFound(record.session_id.clone()));
        }

        if let Some(last) = self.last_response_order(&record.session_id).await? {
            if record.response_order <= last {
                return Err(PersistenceError::NonMonotonicOrder {
                    last,
                    got: record.response_order,
                });
            }
        }

        let query = format!(
            "INSERT INTO {}.interview_responses (
                session_id, response_order, question_id, question_text,
                question_type, answer_text, transcription_time, audio_url, recorded_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    record.session_id.as_str(),
                    record.response_order as i32,
                    record.question_id.to_string(),
                    record.question_text.as_str(),
                    record.question_kind.as_str(),
                    record.answer_text.as_str(),
                    record.transcription_time,
                    record.audio_url.as_str(),
                    record.recorded_at.timestamp_millis(),
                ),
            )
            .await?;

        Ok(())
    }

    async fn responses(&self, session_id: &str) -> Result<Vec<ResponseRecord>, PersistenceError> {
        let query = format!(
            "SELECT session_id, response_order, question_id, question_text,
                    question_type, answer_text, transcription_time, audio_url, recorded_at
             FROM {}.interview_responses WHERE session_id = ? ORDER BY response_order ASC",
            self.client.keyspace()
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (session_id,))
            .await?;

        let mut records = Vec::new();
        if let Some(rows) = result.rows {
            for row in rows {
                let (
                    session_id,
                    response_order,
                    question_id,
                    question_text,
                    question_type,
                    answer_text,
                    transcription_time,
                    audio_url,
                    recorded_at,
                ): (String, i32, String, String, String, String, f64, String, i64) = row
                    .into_typed()
                    .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;

                records.push(ResponseRecord {
                    session_id,
                    question_id: question_id
                        .parse::<QuestionId>()
                        .map_err(|e| PersistenceError::InvalidData(e.to_string()))?,
                    question_text,
                    question_kind: question_type
                        .parse()
                        .map_err(PersistenceError::InvalidData)?,
                    answer_text,
                    transcription_time,
                    audio_url,
                    response_order: response_order as u32,
                    recorded_at: DateTime::from_timestamp_millis(recorded_at)
                        .unwrap_or_else(Utc::now),
                });
            }
        }

        Ok(records)
    }

    fn is_distributed(&self) -> bool {
        true
    }
}

// =============================================================================
// In-memory implementation
// =============================================================================

/// In-memory interview store for tests and development.
#[derive(Default)]
pub struct InMemoryInterviewStore {
    sessions: RwLock<HashMap<String, InterviewSession>>,
    responses: RwLock<HashMap<String, Vec<ResponseRecord>>>,
}

impl InMemoryInterviewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InterviewStore for InMemoryInterviewStore {
    async fn create(
        &self,
        session_id: &str,
        total_questions: u32,
    ) -> Result<InterviewSession, PersistenceError> {
        let mut sessions = self.sessions.write();
        if sessions.contains_key(session_id) {
            return Err(PersistenceError::AlreadyExists(session_id.to_string()));
        }

        let session = InterviewSession::new(session_id, total_questions);
        sessions.insert(session_id.to_string(), session.clone());
        Ok(session)
    }

    async fn get(&self, session_id: &str) -> Result<Option<InterviewSession>, PersistenceError> {
        Ok(self.sessions.read().get(session_id).cloned())
    }

    async fn complete(&self, session_id: &str) -> Result<InterviewSession, PersistenceError> {
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| PersistenceError::NotFound(session_id.to_string()))?;

        if session.status == InterviewStatus::Completed {
            return Err(PersistenceError::AlreadyCompleted(session_id.to_string()));
        }

        session.status = InterviewStatus::Completed;
        session.completed_at = Some(Utc::now());
        Ok(session.clone())
    }

    async fn append_response(&self, record: &ResponseRecord) -> Result<(), PersistenceError> {
        if !self.sessions.read().contains_key(&record.session_id) {
            return Err(PersistenceError::NotFound(record.session_id.clone()));
        }

        let mut responses = self.responses.write();
        let records = responses.entry(record.session_id.clone()).or_default();

        if let Some(last) = records.last().map(|r| r.response_order) {
            if record.response_order <= last {
                return Err(PersistenceError::NonMonotonicOrder {
                    last,
                    got: record.response_order,
                });
            }
        }

        records.push(record.clone());
        Ok(())
    }

    async fn responses(&self, session_id: &str) -> Result<Vec<ResponseRecord>, PersistenceError> {
        Ok(self
            .responses
            .read()
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }

    fn is_distributed(&self) -> bool {
        false
    }
}
