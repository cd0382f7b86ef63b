//! Core traits and types for the survey agent
//!
//! This crate provides foundational types used across all other crates:
//! - The question catalog (ids, kinds, validation)
//! - Answer classification types
//! - Interview session and response records
//! - Traits for pluggable provider backends (STT, TTS, classifier)
//! - Error types

pub mod classification;
pub mod error;
pub mod interview;
pub mod question;
pub mod traits;

pub use classification::{Category, Classification};
pub use error::{Error, Result};
pub use interview::{InterviewSession, InterviewStatus, ResponseRecord};
pub use question::{CatalogError, Question, QuestionCatalog, QuestionId, QuestionKind};
pub use traits::{AnswerClassifier, SpeechToText, TextToSpeech, Transcription};
