//! Answer classification types
//!
//! Every raw answer is labelled with one of six categories before the flow
//! controller is allowed to advance the interview. The seventh category,
//! `Error`, is the fallback when the upstream classifier produces output we
//! cannot parse; it behaves like any other non-valid label.

use serde::{Deserialize, Serialize};

/// Six-way answer label plus the parse-failure fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Valid,
    Irrelevant,
    Evasive,
    Abusive,
    Repeat,
    Refusal,
    Error,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Irrelevant => "irrelevant",
            Self::Evasive => "evasive",
            Self::Abusive => "abusive",
            Self::Repeat => "repeat",
            Self::Refusal => "refusal",
            Self::Error => "error",
        }
    }
}

/// Result of classifying one answer against its question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    /// Urdu guidance spoken back to the respondent on non-valid outcomes.
    /// Empty for valid answers.
    #[serde(default)]
    pub message: String,
}

impl Classification {
    pub fn valid() -> Self {
        Self {
            category: Category::Valid,
            message: String::new(),
        }
    }

    /// Fallback used when the upstream call fails or returns garbage.
    pub fn error_fallback(message: impl Into<String>) -> Self {
        Self {
            category: Category::Error,
            message: message.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.category == Category::Valid
    }

    pub fn is_refusal(&self) -> bool {
        self.category == Category::Refusal
    }
}
