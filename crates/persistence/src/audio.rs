//! Answer audio storage
//!
//! One WAV clip per answered question. The local store writes under the
//! configured media directory and hands back the URL the server serves the
//! file from.

use async_trait::async_trait;
use std::path::PathBuf;
use uuid::Uuid;

use survey_agent_core::QuestionId;

use crate::error::PersistenceError;

/// Storage for raw answer audio.
#[async_trait]
pub trait AudioStore: Send + Sync {
    /// Store one clip and return its public URL.
    async fn store(
        &self,
        session_id: &str,
        question_id: QuestionId,
        audio: &[u8],
    ) -> Result<String, PersistenceError>;
}

/// Filesystem-backed audio store.
pub struct LocalAudioStore {
    media_dir: PathBuf,
    public_base_url: String,
}

impl LocalAudioStore {
    pub fn new(media_dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        let public_base_url: String = public_base_url.into();
        Self {
            media_dir: media_dir.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Session ids end up in filesystem paths; only allow safe characters.
fn validate_path_component(id: &str) -> Result<(), PersistenceError> {
    if id.is_empty()
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(PersistenceError::InvalidData(format!(
            "unsafe path component: {id:?}"
        )));
    }
    Ok(())
}

#[async_trait]
impl AudioStore for LocalAudioStore {
    async fn store(
        &self,
        session_id: &str,
        question_id: QuestionId,
        audio: &[u8],
    ) -> Result<String, PersistenceError> {
        validate_path_component(session_id)?;

        let relative = format!(
            "interviews/{}/{}_{}.wav",
            session_id,
            question_id,
            Uuid::new_v4()
        );
        let path = self.media_dir.join(&relative);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PersistenceError::Storage(e.to_string()))?;
        }

        tokio::fs::write(&path, audio)
            .await
            .map_err(|e| PersistenceError::Storage(e.to_string()))?;

        tracing::debug!(path = %path.display(), bytes = audio.len(), "Answer audio stored");
        Ok(format!("{}/media/{}", self.public_base_url, relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_writes_file_and_builds_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAudioStore::new(dir.path(), "http://localhost:8080/");

        let url = store
            .store("session-1", QuestionId(3), b"RIFF fake wav")
            .await
            .unwrap();

        assert!(url.starts_with("http://localhost:8080/media/interviews/session-1/3_"));
        assert!(url.ends_with(".wav"));

        // The file really exists under the media dir
        let relative = url.strip_prefix("http://localhost:8080/media/").unwrap();
        let stored = std::fs::read(dir.path().join(relative)).unwrap();
        assert_eq!(stored, b"RIFF fake wav");
    }

    #[tokio::test]
    async fn test_clips_for_same_question_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAudioStore::new(dir.path(), "http://localhost:8080");

        let first = store.store("s", QuestionId(1), b"a").await.unwrap();
        let second = store.store("s", QuestionId(1), b"b").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_traversal_session_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAudioStore::new(dir.path(), "http://localhost:8080");

        let err = store
            .store("../escape", QuestionId(1), b"a")
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidData(_)));
    }
}
