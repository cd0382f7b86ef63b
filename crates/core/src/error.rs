//! Shared error type for provider contracts

use thiserror::Error;

/// Errors surfaced by the provider traits in this crate.
///
/// Each provider crate has its own richer error enum; those convert into
/// this type at the trait boundary so callers see one taxonomy.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Answer classification failed: {0}")]
    Classification(String),

    #[error("Audio storage failed: {0}")]
    Storage(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
