//! Next-question decision procedure

use crate::sentiment::{sentiment, Sentiment};
use survey_agent_core::{Classification, QuestionCatalog, QuestionId, QuestionKind};
use thiserror::Error;

/// Guidance spoken when a scale answer contains no usable 1-9 value.
pub const SCALE_GUIDANCE: &str = "براہِ مہربانی 1 سے 9 کے درمیان نمبر بولیں۔";

/// What the interview does after an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// Ask this question next.
    Advance(QuestionId),
    /// Re-present the same question with a guidance message.
    Repeat {
        question: QuestionId,
        message: String,
    },
    /// The interview is over.
    Complete,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FlowError {
    #[error("Question {0} is not in the catalog")]
    UnknownQuestion(QuestionId),
}

/// Decide the next step of the interview.
///
/// Rules, in order:
/// - a refusal ends the interview;
/// - any other non-valid answer repeats the current question and never
///   advances;
/// - a valid answer to a follow-up question branches on sentiment: dislike
///   asks the conditional reason question (+1), like skips it (+2), an
///   unparseable scale value repeats with [`SCALE_GUIDANCE`];
/// - a valid answer to anything else advances by one;
/// - advancing past the end of the catalog completes the interview.
pub fn next_step(
    catalog: &QuestionCatalog,
    current: QuestionId,
    classification: &Classification,
    answer: &str,
) -> Result<NextStep, FlowError> {
    let question = catalog
        .get(current)
        .ok_or(FlowError::UnknownQuestion(current))?;

    if classification.is_refusal() {
        tracing::info!(question = %current, "Respondent refused, ending interview");
        return Ok(NextStep::Complete);
    }

    if !classification.is_valid() {
        return Ok(NextStep::Repeat {
            question: current,
            message: classification.message.clone(),
        });
    }

    let next = match question.kind {
        QuestionKind::FollowUp => match sentiment(answer) {
            Sentiment::Dislike => current.next(),
            Sentiment::Like => current.skip_one(),
            Sentiment::Invalid => {
                return Ok(NextStep::Repeat {
                    question: current,
                    message: SCALE_GUIDANCE.to_string(),
                });
            }
        },
        QuestionKind::General | QuestionKind::Conditional => current.next(),
    };

    if next > catalog.last_id() {
        Ok(NextStep::Complete)
    } else {
        Ok(NextStep::Advance(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_agent_core::{Category, Question};

    /// Eight questions shaped like the deployed survey: question 5 is the
    /// follow-up branch point, question 6 the conditional reason question.
    fn catalog() -> QuestionCatalog {
        let questions = (1..=8)
            .map(|id| Question {
                id: QuestionId(id),
                text: format!("سوال {id}"),
                kind: match id {
                    5 => QuestionKind::FollowUp,
                    6 => QuestionKind::Conditional,
                    _ => QuestionKind::General,
                },
            })
            .collect();
        QuestionCatalog::new(questions).unwrap()
    }

    fn classified(category: Category) -> Classification {
        Classification {
            category,
            message: "رہنمائی".to_string(),
        }
    }

    #[test]
    fn test_valid_general_advances_by_one() {
        let step = next_step(&catalog(), QuestionId(2), &Classification::valid(), "پچیس سال").unwrap();
        assert_eq!(step, NextStep::Advance(QuestionId(3)));
    }

    #[test]
    fn test_non_valid_repeats_same_question() {
        for category in [
            Category::Irrelevant,
            Category::Evasive,
            Category::Abusive,
            Category::Repeat,
            Category::Error,
        ] {
            let step =
                next_step(&catalog(), QuestionId(3), &classified(category), "کچھ بھی").unwrap();
            assert_eq!(
                step,
                NextStep::Repeat {
                    question: QuestionId(3),
                    message: "رہنمائی".to_string(),
                },
                "{category:?}"
            );
        }
    }

    #[test]
    fn test_repeat_is_idempotent() {
        // Feeding the same invalid answer repeatedly never advances
        let mut current = QuestionId(4);
        for _ in 0..5 {
            match next_step(&catalog(), current, &classified(Category::Evasive), "...").unwrap() {
                NextStep::Repeat { question, .. } => current = question,
                other => panic!("expected repeat, got {other:?}"),
            }
        }
        assert_eq!(current, QuestionId(4));
    }

    #[test]
    fn test_refusal_completes_anywhere() {
        for id in 1..=8 {
            let step =
                next_step(&catalog(), QuestionId(id), &classified(Category::Refusal), "نہیں")
                    .unwrap();
            assert_eq!(step, NextStep::Complete, "question {id}");
        }
    }

    #[test]
    fn test_follow_up_dislike_asks_reason() {
        let step = next_step(&catalog(), QuestionId(5), &Classification::valid(), "3").unwrap();
        assert_eq!(step, NextStep::Advance(QuestionId(6)));
    }

    #[test]
    fn test_follow_up_like_skips_reason() {
        let step = next_step(&catalog(), QuestionId(5), &Classification::valid(), "۷").unwrap();
        assert_eq!(step, NextStep::Advance(QuestionId(7)));
    }

    #[test]
    fn test_follow_up_without_number_repeats_with_guidance() {
        let step =
            next_step(&catalog(), QuestionId(5), &Classification::valid(), "اچھا تھا").unwrap();
        assert_eq!(
            step,
            NextStep::Repeat {
                question: QuestionId(5),
                message: SCALE_GUIDANCE.to_string(),
            }
        );
    }

    #[test]
    fn test_last_question_completes() {
        let step = next_step(&catalog(), QuestionId(8), &Classification::valid(), "بس اتنا ہی")
            .unwrap();
        assert_eq!(step, NextStep::Complete);
    }

    #[test]
    fn test_advance_never_escapes_catalog() {
        // A follow-up at the second-to-last slot would skip past the end
        let questions = vec![
            Question {
                id: QuestionId(1),
                text: "پہلا".into(),
                kind: QuestionKind::General,
            },
            Question {
                id: QuestionId(2),
                text: "اسکیل".into(),
                kind: QuestionKind::FollowUp,
            },
            Question {
                id: QuestionId(3),
                text: "وجہ".into(),
                kind: QuestionKind::Conditional,
            },
        ];
        let catalog = QuestionCatalog::new(questions).unwrap();
        let step = next_step(&catalog, QuestionId(2), &Classification::valid(), "9").unwrap();
        assert_eq!(step, NextStep::Complete);
    }

    #[test]
    fn test_unknown_question_is_an_error() {
        let err = next_step(&catalog(), QuestionId(42), &Classification::valid(), "7").unwrap_err();
        assert_eq!(err, FlowError::UnknownQuestion(QuestionId(42)));
    }
}
