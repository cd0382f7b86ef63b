//! CSV export of a completed interview
//!
//! Layout matches the files analysts already work with: a session header
//! block, the response table ordered by response order, and a transcription
//! time total. The output starts with a UTF-8 BOM so Urdu text opens
//! correctly in spreadsheet tools.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use chrono::Utc;

use survey_agent_core::{InterviewSession, ResponseRecord};

use crate::state::AppState;
use crate::ServerError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Generate and download the CSV for one session
pub async fn generate_csv(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let interview = state
        .store
        .get(&session_id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Interview session {session_id}")))?;

    let responses = state.store.responses(&session_id).await?;
    if responses.is_empty() {
        return Err(ServerError::NotFound(
            "No responses found for this session".to_string(),
        ));
    }

    let body = render_csv(&interview, &responses)?;
    let filename = format!(
        "interview_{}_{}.csv",
        session_id,
        Utc::now().format("%Y%m%d_%H%M%S")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}

/// Render one session to CSV bytes.
fn render_csv(
    session: &InterviewSession,
    responses: &[ResponseRecord],
) -> Result<Vec<u8>, ServerError> {
    let mut buf = Vec::from(UTF8_BOM);

    {
        // Header rows and data rows have different widths
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(&mut buf);

        write_rows(&mut writer, session, responses)
            .map_err(|e| ServerError::Internal(format!("CSV generation failed: {e}")))?;
    }

    Ok(buf)
}

fn write_rows<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    session: &InterviewSession,
    responses: &[ResponseRecord],
) -> Result<(), csv::Error> {
    writer.write_record(["Session ID", &session.session_id])?;
    writer.write_record(["Started At", &session.started_at.to_rfc3339()])?;
    writer.write_record([
        "Completed At",
        &session
            .completed_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default(),
    ])?;
    writer.write_record([""])?;

    writer.write_record([
        "Order",
        "Question ID",
        "Type",
        "Question",
        "Answer",
        "Time (s)",
        "Recorded At",
        "Audio URL",
    ])?;

    let mut total_time = 0.0;
    for record in responses {
        total_time += record.transcription_time;
        writer.write_record([
            record.response_order.to_string().as_str(),
            &record.question_id.to_string(),
            record.question_kind.as_str(),
            &record.question_text,
            &record.answer_text,
            &format!("{:.2}", record.transcription_time),
            &record.recorded_at.to_rfc3339(),
            &record.audio_url,
        ])?;
    }

    writer.write_record([""])?;
    writer.write_record([
        "Total Transcription Time",
        &format!("{total_time:.2} seconds"),
    ])?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use axum::http::StatusCode;
    use survey_agent_core::{QuestionId, QuestionKind};

    fn record(order: u32, answer: &str, time: f64) -> ResponseRecord {
        ResponseRecord {
            session_id: "s1".into(),
            question_id: QuestionId(order),
            question_text: format!("سوال {order}"),
            question_kind: QuestionKind::General,
            answer_text: answer.into(),
            transcription_time: time,
            audio_url: format!("http://localhost:8080/media/interviews/s1/{order}.wav"),
            response_order: order,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_csv_starts_with_bom() {
        let session = InterviewSession::new("s1", 8);
        let csv = render_csv(&session, &[record(1, "جواب", 1.0)]).unwrap();
        assert_eq!(&csv[..3], UTF8_BOM);
    }

    #[test]
    fn test_csv_keeps_urdu_text_and_totals_time() {
        let session = InterviewSession::new("s1", 8);
        let csv = render_csv(
            &session,
            &[record(1, "مجھے پسند آیا", 1.25), record(2, "پچیس سال", 0.75)],
        )
        .unwrap();

        let text = String::from_utf8(csv[3..].to_vec()).unwrap();
        assert!(text.contains("مجھے پسند آیا"));
        assert!(text.contains("پچیس سال"));
        assert!(text.contains("Total Transcription Time,2.00 seconds"));
        assert!(text.contains("Session ID,s1"));
    }

    #[test]
    fn test_csv_quotes_embedded_commas() {
        let session = InterviewSession::new("s1", 8);
        let csv = render_csv(&session, &[record(1, "ایک، دو, تین", 1.0)]).unwrap();
        let text = String::from_utf8(csv[3..].to_vec()).unwrap();
        assert!(text.contains("\"ایک، دو, تین\""));
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let state = testing::state(Some("جواب"), None);
        let err = generate_csv(State(state), Path("ghost".into()))
            .await
            .err()
            .unwrap();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_session_without_responses_is_404() {
        let state = testing::state(Some("جواب"), None);
        state.store.create("s1", 8).await.unwrap();

        let err = generate_csv(State(state), Path("s1".into()))
            .await
            .err()
            .unwrap();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
