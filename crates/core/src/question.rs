//! Question catalog types
//!
//! The catalog is an immutable, ordered list of questions loaded once at
//! startup. Handlers carry the current question id explicitly; the catalog is
//! the single source of truth for question text and branching kind.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a question within the catalog.
///
/// Stored and transmitted as a string (the deployed frontend sends `"5"`),
/// held as a number internally so the flow controller can do offset
/// arithmetic on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuestionId(pub u32);

impl QuestionId {
    /// The id of the question directly after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// The id two positions ahead (used to skip a conditional question).
    pub fn skip_one(self) -> Self {
        Self(self.0 + 2)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuestionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(QuestionId)
    }
}

impl Serialize for QuestionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Accept both `"5"` (wire format) and `5` (hand-written YAML)
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(u32),
            Str(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Ok(QuestionId(n)),
            Repr::Str(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// How a question participates in the interview flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    /// Always asked, always advances by one on a valid answer.
    General,
    /// A 1-9 scale question whose sentiment decides the branch.
    FollowUp,
    /// Only asked when the preceding follow-up scored "dislike".
    Conditional,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::FollowUp => "follow-up",
            Self::Conditional => "conditional",
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(Self::General),
            "follow-up" => Ok(Self::FollowUp),
            "conditional" => Ok(Self::Conditional),
            other => Err(format!("unknown question kind: {other}")),
        }
    }
}

/// One scripted interview question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
}

/// Catalog validation failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Question catalog is empty")]
    Empty,

    #[error("Question ids must be contiguous from 1: expected {expected}, found {found}")]
    NonContiguous { expected: u32, found: u32 },

    #[error("Conditional question {0} does not directly follow a follow-up question")]
    OrphanConditional(QuestionId),
}

/// Immutable, ordered question catalog.
///
/// Construction goes through [`QuestionCatalog::new`] so every catalog in the
/// system has passed shape validation.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Build a catalog and validate its shape.
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        let catalog = Self { questions };
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.questions.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (idx, question) in self.questions.iter().enumerate() {
            let expected = idx as u32 + 1;
            if question.id.as_u32() != expected {
                return Err(CatalogError::NonContiguous {
                    expected,
                    found: question.id.as_u32(),
                });
            }

            // A skipped conditional must have a follow-up branch point before it
            if question.kind == QuestionKind::Conditional {
                let precedes = idx
                    .checked_sub(1)
                    .and_then(|i| self.questions.get(i))
                    .map(|q| q.kind == QuestionKind::FollowUp)
                    .unwrap_or(false);
                if !precedes {
                    return Err(CatalogError::OrphanConditional(question.id));
                }
            }
        }

        Ok(())
    }

    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn contains(&self, id: QuestionId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Highest question id in the catalog.
    pub fn last_id(&self) -> QuestionId {
        QuestionId(self.questions.len() as u32)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u32, kind: QuestionKind) -> Question {
        Question {
            id: QuestionId(id),
            text: format!("سوال {id}"),
            kind,
        }
    }

    #[test]
    fn test_question_id_wire_format() {
        let q = question(5, QuestionKind::FollowUp);
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains(r#""id":"5""#));
        assert!(json.contains(r#""type":"follow-up""#));

        let parsed: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, QuestionId(5));
        assert_eq!(parsed.kind, QuestionKind::FollowUp);
    }

    #[test]
    fn test_question_id_accepts_numbers() {
        let parsed: Question =
            serde_json::from_str(r#"{"id": 3, "text": "عمر", "type": "general"}"#).unwrap();
        assert_eq!(parsed.id, QuestionId(3));
    }

    #[test]
    fn test_catalog_rejects_empty() {
        assert_eq!(QuestionCatalog::new(vec![]).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn test_catalog_rejects_gapped_ids() {
        let err = QuestionCatalog::new(vec![
            question(1, QuestionKind::General),
            question(3, QuestionKind::General),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::NonContiguous {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_catalog_rejects_orphan_conditional() {
        let err = QuestionCatalog::new(vec![
            question(1, QuestionKind::General),
            question(2, QuestionKind::Conditional),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::OrphanConditional(QuestionId(2)));
    }

    #[test]
    fn test_catalog_accepts_branching_shape() {
        let catalog = QuestionCatalog::new(vec![
            question(1, QuestionKind::General),
            question(2, QuestionKind::FollowUp),
            question(3, QuestionKind::Conditional),
            question(4, QuestionKind::General),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.last_id(), QuestionId(4));
        assert!(catalog.contains(QuestionId(3)));
        assert!(!catalog.contains(QuestionId(5)));
    }
}
