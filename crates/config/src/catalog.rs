//! Question catalog loading
//!
//! The catalog is versioned configuration data, not logic. It is loaded from
//! a YAML file at startup; when the file is absent the built-in survey (the
//! deployed Rio biscuit questionnaire) is used so a fresh checkout runs
//! without any setup.

use serde::Deserialize;
use std::path::Path;

use survey_agent_core::{Question, QuestionCatalog, QuestionId, QuestionKind};

use crate::ConfigError;

#[derive(Deserialize)]
struct CatalogFile {
    questions: Vec<Question>,
}

/// Load the question catalog from a YAML file.
///
/// A missing file falls back to [`default_catalog`]; an unreadable or invalid
/// file is an error.
pub fn load_catalog(path: &str) -> Result<QuestionCatalog, ConfigError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::warn!(
            path = %path.display(),
            "Question catalog file not found, using the built-in survey"
        );
        return Ok(default_catalog());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::FileNotFound(format!("{}: {e}", path.display())))?;

    let file: CatalogFile =
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    QuestionCatalog::new(file.questions).map_err(|e| ConfigError::InvalidValue {
        field: "questions".to_string(),
        message: e.to_string(),
    })
}

/// The built-in survey: eight Urdu questions about the Rio biscuit, with the
/// overall-liking scale (question 5) as the branch point and the dislike
/// reason (question 6) as its conditional follow-up.
pub fn default_catalog() -> QuestionCatalog {
    let questions = vec![
        question(1, "آپ کا جینڈر کیا ہے؟ مرد یا عورت", QuestionKind::General),
        question(2, "اپنی عمر بتائیں۔", QuestionKind::General),
        question(
            3,
            "آپ کو ریو بسکٹ دیکھنے میں کیسا لگا؟ 1 سے 7 کے اسکیل پر بتائیں، جہاں 1 کا مطلب ہے 'بالکل بھی پسند نہیں آیا' اور 7 کا مطلب ہے 'بہت پسند آیا'۔",
            QuestionKind::General,
        ),
        question(
            4,
            "برائے مہربانی بتائیں کہ آپ کو ریو کا ذائقہ کس حد تک پسند آیا؟ 1 سے 7 کے اسکیل پر جہاں 1 کا مطلب ہے بالکل بھی پسند نہیں آیا اور 7 کا مطلب ہے بہت پسند آیا۔",
            QuestionKind::General,
        ),
        question(
            5,
            "مجموعی طور پر آپ کو ریو کیسا لگا؟ 1 سے 9 کے اسکیل پر بتائیں، جہاں 1 کا مطلب ہے 'بالکل بھی پسند نہیں آیا' اور 9 کا مطلب ہے 'بہت پسند آیا'۔",
            QuestionKind::FollowUp,
        ),
        question(
            6,
            "آپ کے جواب سے لگتا ہے آپ کو ریو نہیں پسند آیا۔ برائے مہربانی تفصیل سے بتائیں کیوں پسند نہیں آیا؟",
            QuestionKind::Conditional,
        ),
        question(
            7,
            "اگر ریو بسکٹ کے 2 بسکٹ کا پیک 30 روپے میں دستیاب ہو، تو کیا آپ اسے خریدیں گے؟ 1، جی ہاں خریدوں گا، 2، نہیں خریدوں گا، 3، شاید یا کچھ کہہ نہیں سکتا۔",
            QuestionKind::General,
        ),
        question(
            8,
            "کیا آپ ریو کے بارے میں کچھ اور کہنا چاہیں گے یا کوئی مشورہ دینا چاہیں گے؟",
            QuestionKind::General,
        ),
    ];

    QuestionCatalog::new(questions).expect("built-in catalog must be valid")
}

fn question(id: u32, text: &str, kind: QuestionKind) -> Question {
    Question {
        id: QuestionId(id),
        text: text.to_string(),
        kind,
    }
}
