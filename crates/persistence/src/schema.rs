//! ScyllaDB schema creation

use crate::error::PersistenceError;
use scylla::Session;

/// Create the keyspace if it doesn't exist
pub async fn create_keyspace(
    session: &Session,
    keyspace: &str,
    replication_factor: u8,
) -> Result<(), PersistenceError> {
    let query = format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
        keyspace, replication_factor
    );

    session
        .query_unpaged(query, &[])
        .await
        .map_err(|e| PersistenceError::SchemaError(format!("Failed to create keyspace: {}", e)))?;

    Ok(())
}

/// Create all required tables
pub async fn create_tables(session: &Session, keyspace: &str) -> Result<(), PersistenceError> {
    // Interviews table: one row per session
    let interviews_table = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.interviews (
            session_id TEXT,
            total_questions INT,
            status TEXT,
            started_at TIMESTAMP,
            completed_at TIMESTAMP,
            PRIMARY KEY (session_id)
        )
    "#,
        keyspace
    );

    session
        .query_unpaged(interviews_table, &[])
        .await
        .map_err(|e| {
            PersistenceError::SchemaError(format!("Failed to create interviews table: {}", e))
        })?;

    // Responses table: clustered by response order within a session
    let responses_table = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.interview_responses (
            session_id TEXT,
            response_order INT,
            question_id TEXT,
            question_text TEXT,
            question_type TEXT,
            answer_text TEXT,
            transcription_time DOUBLE,
            audio_url TEXT,
            recorded_at TIMESTAMP,
            PRIMARY KEY ((session_id), response_order)
        ) WITH CLUSTERING ORDER BY (response_order ASC)
    "#,
        keyspace
    );

    session
        .query_unpaged(responses_table, &[])
        .await
        .map_err(|e| {
            PersistenceError::SchemaError(format!(
                "Failed to create interview_responses table: {}",
                e
            ))
        })?;

    tracing::info!("All tables created successfully");
    Ok(())
}
