//! Answer submission endpoint
//!
//! One interview turn: audio in, next-question decision out.
//!
//! Flow:
//! 1. Receive answer audio (base64) with session/question identifiers
//! 2. Transcribe and store the audio concurrently; both must land before
//!    any flow decision is made
//! 3. Classify the transcript against the question
//! 4. Run the flow controller for the next step
//! 5. Append the response record and reply

use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use survey_agent_core::{Classification, QuestionId, ResponseRecord};
use survey_agent_flow::{next_step, NextStep};
use survey_agent_llm::CLASSIFIER_RETRY_MESSAGE;

use crate::metrics::{record_answer_turn, record_stt_latency, record_upstream_failure};
use crate::state::AppState;
use crate::ServerError;

/// Request for one answer turn
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// Base64 encoded answer audio
    pub audio: String,
    /// Audio container format, informational only
    #[serde(default)]
    pub audio_format: Option<String>,
    pub session_id: String,
    /// Id of the question this answer belongs to
    pub question_id: String,
    /// Position of this response within the session, must increase
    pub response_order: u32,
}

/// Response for one answer turn
#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub success: bool,
    #[serde(flatten)]
    pub record: ResponseRecord,
    /// What the caller should do next: advance, repeat, or complete
    pub action: &'static str,
    /// Question to present next; the current one on repeat, absent when done
    #[serde(rename = "next_qes_id")]
    pub next_question_id: Option<QuestionId>,
    /// Urdu guidance to speak before re-asking, empty otherwise
    pub message: String,
}

/// Handle one answer turn
pub async fn submit_answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ServerError> {
    if request.session_id.trim().is_empty() {
        return Err(ServerError::MissingField("session_id"));
    }
    if request.question_id.trim().is_empty() {
        return Err(ServerError::MissingField("question_id"));
    }

    let question_id: QuestionId = request.question_id.parse().map_err(|_| {
        ServerError::InvalidRequest(format!("unparseable question id: {}", request.question_id))
    })?;

    let question = state
        .catalog
        .get(question_id)
        .ok_or_else(|| ServerError::InvalidRequest(format!("unknown question id: {question_id}")))?
        .clone();

    state
        .store
        .get(&request.session_id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Interview session {}", request.session_id)))?;

    let audio_bytes = BASE64
        .decode(request.audio.as_bytes())
        .map_err(|e| ServerError::InvalidRequest(format!("invalid base64 audio: {e}")))?;

    tracing::info!(
        session_id = %request.session_id,
        question_id = %question_id,
        audio_format = request.audio_format.as_deref().unwrap_or("wav"),
        audio_bytes = audio_bytes.len(),
        "Answer received"
    );

    // Transcription and audio upload are independent; run them concurrently.
    // Both must complete before the flow controller sees the turn.
    let (transcription, audio_url) = tokio::try_join!(
        async {
            state.stt.transcribe(&audio_bytes).await.map_err(|e| {
                record_upstream_failure("stt");
                ServerError::from(e)
            })
        },
        async {
            state
                .audio
                .store(&request.session_id, question_id, &audio_bytes)
                .await
                .map_err(|e| {
                    record_upstream_failure("storage");
                    ServerError::from(e)
                })
        },
    )?;

    record_stt_latency(transcription.elapsed.as_secs_f64());

    // A dead classifier repeats the question instead of killing the turn
    let classification = match state
        .classifier
        .classify(&question.text, &transcription.text)
        .await
    {
        Ok(classification) => classification,
        Err(e) => {
            record_upstream_failure("classifier");
            tracing::error!(error = %e, "Classifier unavailable, repeating question");
            Classification::error_fallback(CLASSIFIER_RETRY_MESSAGE)
        }
    };

    let step = next_step(
        &state.catalog,
        question_id,
        &classification,
        &transcription.text,
    )?;

    let record = ResponseRecord {
        session_id: request.session_id.clone(),
        question_id,
        question_text: question.text.clone(),
        question_kind: question.kind,
        answer_text: transcription.text.clone(),
        transcription_time: round2(transcription.elapsed.as_secs_f64()),
        audio_url,
        response_order: request.response_order,
        recorded_at: Utc::now(),
    };

    state.store.append_response(&record).await?;

    let (action, next_question_id, message) = match step {
        NextStep::Advance(id) => ("advance", Some(id), String::new()),
        NextStep::Repeat { question, message } => ("repeat", Some(question), message),
        NextStep::Complete => ("complete", None, String::new()),
    };

    record_answer_turn(action);
    tracing::info!(
        session_id = %request.session_id,
        question_id = %question_id,
        category = classification.category.as_str(),
        action,
        next = ?next_question_id,
        "Turn complete"
    );

    Ok(Json(AnswerResponse {
        success: true,
        record,
        action,
        next_question_id,
        message,
    }))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use axum::http::StatusCode;
    use survey_agent_core::Category;
    use survey_agent_flow::SCALE_GUIDANCE;

    fn request(session_id: &str, question_id: &str, order: u32) -> AnswerRequest {
        AnswerRequest {
            audio: BASE64.encode(b"RIFF fake wav"),
            audio_format: Some("wav".into()),
            session_id: session_id.into(),
            question_id: question_id.into(),
            response_order: order,
        }
    }

    async fn with_session(state: &crate::AppState, session_id: &str) {
        state.store.create(session_id, 8).await.unwrap();
    }

    #[tokio::test]
    async fn test_valid_answer_advances() {
        let state = testing::state(Some("پچیس سال"), Some(Classification::valid()));
        with_session(&state, "s1").await;

        let response = submit_answer(State(state.clone()), Json(request("s1", "2", 1)))
            .await
            .unwrap();

        assert_eq!(response.0.action, "advance");
        assert_eq!(response.0.next_question_id, Some(QuestionId(3)));
        assert_eq!(response.0.record.answer_text, "پچیس سال");
        assert_eq!(response.0.record.transcription_time, 1.28);

        // The record was persisted
        let stored = state.store.responses("s1").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].question_id, QuestionId(2));
    }

    #[tokio::test]
    async fn test_follow_up_like_skips_conditional() {
        let state = testing::state(Some("۷"), Some(Classification::valid()));
        with_session(&state, "s1").await;

        let response = submit_answer(State(state), Json(request("s1", "5", 5)))
            .await
            .unwrap();

        assert_eq!(response.0.action, "advance");
        assert_eq!(response.0.next_question_id, Some(QuestionId(7)));
    }

    #[tokio::test]
    async fn test_follow_up_dislike_asks_reason() {
        let state = testing::state(Some("تین"), Some(Classification::valid()));
        with_session(&state, "s1").await;

        let response = submit_answer(State(state), Json(request("s1", "5", 5)))
            .await
            .unwrap();

        assert_eq!(response.0.next_question_id, Some(QuestionId(6)));
    }

    #[tokio::test]
    async fn test_follow_up_without_number_repeats_with_guidance() {
        let state = testing::state(Some("بہت اچھا"), Some(Classification::valid()));
        with_session(&state, "s1").await;

        let response = submit_answer(State(state), Json(request("s1", "5", 5)))
            .await
            .unwrap();

        assert_eq!(response.0.action, "repeat");
        assert_eq!(response.0.next_question_id, Some(QuestionId(5)));
        assert_eq!(response.0.message, SCALE_GUIDANCE);
    }

    #[tokio::test]
    async fn test_evasive_answer_repeats() {
        let state = testing::state(
            Some("مجھے نہیں پتا"),
            Some(Classification {
                category: Category::Evasive,
                message: "براہِ کرم سوال کا جواب دیں۔".into(),
            }),
        );
        with_session(&state, "s1").await;

        let response = submit_answer(State(state), Json(request("s1", "3", 3)))
            .await
            .unwrap();

        assert_eq!(response.0.action, "repeat");
        assert_eq!(response.0.next_question_id, Some(QuestionId(3)));
        assert_eq!(response.0.message, "براہِ کرم سوال کا جواب دیں۔");
    }

    #[tokio::test]
    async fn test_refusal_completes() {
        let state = testing::state(
            Some("مجھے یہ انٹرویو ختم کرنا ہے"),
            Some(Classification {
                category: Category::Refusal,
                message: "شکریہ".into(),
            }),
        );
        with_session(&state, "s1").await;

        let response = submit_answer(State(state), Json(request("s1", "4", 4)))
            .await
            .unwrap();

        assert_eq!(response.0.action, "complete");
        assert_eq!(response.0.next_question_id, None);
    }

    #[tokio::test]
    async fn test_last_question_completes() {
        let state = testing::state(Some("نہیں، شکریہ"), Some(Classification::valid()));
        with_session(&state, "s1").await;

        let response = submit_answer(State(state), Json(request("s1", "8", 8)))
            .await
            .unwrap();

        assert_eq!(response.0.action, "complete");
    }

    #[tokio::test]
    async fn test_classifier_outage_repeats_instead_of_failing() {
        let state = testing::state(Some("جواب"), None);
        with_session(&state, "s1").await;

        let response = submit_answer(State(state.clone()), Json(request("s1", "2", 1)))
            .await
            .unwrap();

        assert_eq!(response.0.action, "repeat");
        assert_eq!(response.0.message, CLASSIFIER_RETRY_MESSAGE);
        // The observed answer is still recorded
        assert_eq!(state.store.responses("s1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transcription_failure_is_a_service_error() {
        let state = testing::state(None, Some(Classification::valid()));
        with_session(&state, "s1").await;

        let err = submit_answer(State(state.clone()), Json(request("s1", "2", 1)))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Nothing was recorded for the failed turn
        assert!(state.store.responses("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_ids_are_400() {
        let state = testing::state(Some("جواب"), Some(Classification::valid()));

        let err = submit_answer(State(state.clone()), Json(request("", "2", 1)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = submit_answer(State(state), Json(request("s1", "", 1)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let state = testing::state(Some("جواب"), Some(Classification::valid()));

        let err = submit_answer(State(state), Json(request("ghost", "2", 1)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_base64_is_400() {
        let state = testing::state(Some("جواب"), Some(Classification::valid()));
        with_session(&state, "s1").await;

        let mut bad = request("s1", "2", 1);
        bad.audio = "not base64 !!!".into();
        let err = submit_answer(State(state), Json(bad)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stale_response_order_is_400() {
        let state = testing::state(Some("جواب"), Some(Classification::valid()));
        with_session(&state, "s1").await;

        submit_answer(State(state.clone()), Json(request("s1", "1", 2)))
            .await
            .unwrap();
        let err = submit_answer(State(state), Json(request("s1", "2", 2)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
