//! Answer classification over the Groq client
//!
//! Labels one answer against the question that was asked. The upstream model
//! is instructed to reply with strict JSON; parsing is deliberately lenient,
//! and anything unparseable maps to the `error` category so a misbehaving
//! model can never advance (or crash) an interview.

use async_trait::async_trait;
use serde::Deserialize;

use survey_agent_core::{AnswerClassifier, Category, Classification};

use crate::groq::{GroqClient, GroqConfig};
use crate::LlmError;

/// Spoken to the respondent when classification output was unusable.
pub const CLASSIFIER_RETRY_MESSAGE: &str =
    "معاف کیجیے، آپ کا جواب سمجھ نہیں آیا۔ براہِ مہربانی دوبارہ جواب دیں۔";

const SYSTEM_PROMPT: &str = r#"You label answers given during a spoken Urdu survey interview. The answer text comes from speech transcription and may contain noise or misspellings; judge it charitably.

Label the answer with exactly one category:
- "valid": a genuine attempt to answer the question that was asked
- "irrelevant": talks about something unrelated to the question
- "evasive": dodges the question without refusing the interview
- "abusive": insults or profanity directed at the interviewer or survey
- "repeat": the respondent asks for the question to be repeated or says they did not understand it
- "refusal": the respondent wants to stop the interview entirely

Reply with a JSON object only, no other text:
{"category": "<one of the six labels>", "message": "<guidance>"}

For "valid" the message must be an empty string. For every other category the message must be one short, polite Urdu sentence telling the respondent how to proceed (for example asking them to answer the question, or to speak respectfully)."#;

/// Groq-backed [`AnswerClassifier`].
pub struct GroqClassifier {
    client: GroqClient,
}

impl GroqClassifier {
    pub fn new(config: GroqConfig) -> Result<Self, LlmError> {
        Ok(Self {
            client: GroqClient::new(config)?,
        })
    }

    fn user_prompt(question: &str, answer: &str) -> String {
        format!("Question (Urdu): {question}\nRespondent's answer (Urdu): {answer}")
    }
}

#[async_trait]
impl AnswerClassifier for GroqClassifier {
    async fn classify(
        &self,
        question: &str,
        answer: &str,
    ) -> survey_agent_core::Result<Classification> {
        let raw = self
            .client
            .chat(SYSTEM_PROMPT, &Self::user_prompt(question, answer), true)
            .await
            .map_err(survey_agent_core::Error::from)?;

        let classification = parse_classification(&raw);
        tracing::debug!(
            model = %self.client.model_name(),
            category = classification.category.as_str(),
            "Answer classified"
        );
        Ok(classification)
    }
}

#[derive(Deserialize)]
struct RawClassification {
    category: String,
    #[serde(default)]
    message: Option<String>,
}

/// Parse model output into a classification.
///
/// Accepts a bare JSON object, a fenced code block, or JSON embedded in
/// surrounding prose. Anything else becomes the `error` category.
pub fn parse_classification(raw: &str) -> Classification {
    let Some(parsed) = try_parse(raw) else {
        tracing::warn!(output = %raw, "Unparseable classifier output");
        return Classification::error_fallback(CLASSIFIER_RETRY_MESSAGE);
    };

    let category = match parsed.category.trim().to_lowercase().as_str() {
        "valid" => Category::Valid,
        "irrelevant" => Category::Irrelevant,
        "evasive" => Category::Evasive,
        "abusive" => Category::Abusive,
        "repeat" => Category::Repeat,
        "refusal" => Category::Refusal,
        other => {
            tracing::warn!(category = %other, "Unknown classification category");
            return Classification::error_fallback(CLASSIFIER_RETRY_MESSAGE);
        }
    };

    let message = parsed.message.unwrap_or_default();
    let message = match category {
        Category::Valid => String::new(),
        // Non-valid outcomes are spoken back; never leave them silent
        _ if message.trim().is_empty() => CLASSIFIER_RETRY_MESSAGE.to_string(),
        _ => message,
    };

    Classification { category, message }
}

fn try_parse(raw: &str) -> Option<RawClassification> {
    let trimmed = raw.trim();
    if let Ok(parsed) = serde_json::from_str::<RawClassification>(trimmed) {
        return Some(parsed);
    }

    // Model wrapped the JSON in prose or a code fence; take the outermost braces
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean_json() {
        let c = parse_classification(r#"{"category": "valid", "message": ""}"#);
        assert_eq!(c.category, Category::Valid);
        assert!(c.message.is_empty());
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"category\": \"evasive\", \"message\": \"براہِ کرم سوال کا جواب دیں۔\"}\n```";
        let c = parse_classification(raw);
        assert_eq!(c.category, Category::Evasive);
        assert_eq!(c.message, "براہِ کرم سوال کا جواب دیں۔");
    }

    #[test]
    fn test_parse_json_in_prose() {
        let raw = r#"Here is the label: {"category": "refusal", "message": "شکریہ"} as requested."#;
        let c = parse_classification(raw);
        assert_eq!(c.category, Category::Refusal);
    }

    #[test]
    fn test_garbage_becomes_error_category() {
        let c = parse_classification("the answer seems fine to me");
        assert_eq!(c.category, Category::Error);
        assert_eq!(c.message, CLASSIFIER_RETRY_MESSAGE);
        assert!(!c.is_valid());
    }

    #[test]
    fn test_unknown_category_becomes_error() {
        let c = parse_classification(r#"{"category": "excellent", "message": "واہ"}"#);
        assert_eq!(c.category, Category::Error);
    }

    #[test]
    fn test_valid_strips_message() {
        let c = parse_classification(r#"{"category": "VALID", "message": "اچھا جواب"}"#);
        assert_eq!(c.category, Category::Valid);
        assert!(c.message.is_empty());
    }

    #[test]
    fn test_non_valid_without_message_gets_fallback_guidance() {
        let c = parse_classification(r#"{"category": "irrelevant"}"#);
        assert_eq!(c.category, Category::Irrelevant);
        assert_eq!(c.message, CLASSIFIER_RETRY_MESSAGE);
    }
}
