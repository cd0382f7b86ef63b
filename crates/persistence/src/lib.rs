//! ScyllaDB persistence layer for the survey agent
//!
//! Provides persistent storage for:
//! - Interview sessions (status lifecycle, completion timestamps)
//! - Per-answer response records, clustered by response order
//! - Answer audio files (local filesystem, served back over HTTP)
//!
//! Stores are trait-based: production runs on ScyllaDB, tests and
//! development use the in-memory implementations.

pub mod audio;
pub mod client;
pub mod error;
pub mod interviews;
pub mod schema;

pub use audio::{AudioStore, LocalAudioStore};
pub use client::{ScyllaClient, ScyllaConfig};
pub use error::PersistenceError;
pub use interviews::{InMemoryInterviewStore, InterviewStore, ScyllaInterviewStore};

/// Initialize the persistence layer: connect and ensure the schema exists.
pub async fn init(config: ScyllaConfig) -> Result<ScyllaInterviewStore, PersistenceError> {
    let client = ScyllaClient::connect(config).await?;
    client.ensure_schema().await?;
    Ok(ScyllaInterviewStore::new(client))
}
