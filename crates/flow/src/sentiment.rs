//! Sentiment mapping for scale answers
//!
//! Deterministic, no side effects: free text in, `Like`/`Dislike`/`Invalid`
//! out. Used solely for branching at the follow-up question.

use crate::urdu;

/// Derived label of a 1-9 scale answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    /// 5-9: the respondent liked the product; skip the reason question.
    Like,
    /// 1-4: the respondent disliked it; ask the conditional reason question.
    Dislike,
    /// No parseable 1-9 value in the answer.
    Invalid,
}

/// Extract the scale value from a free-text answer.
///
/// Digits (Urdu glyphs or ASCII) and number words (Urdu script or Latin
/// transliteration) are both recognized; the first number found in reading
/// order wins. Returns `None` when no number is found or the first one falls
/// outside 1-9.
pub fn scale_value(text: &str) -> Option<u8> {
    let normalized = urdu::urdu_numerals_to_ascii(text);

    for token in normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let value = if token.chars().all(|c| c.is_ascii_digit()) {
            token.parse::<u32>().ok()
        } else {
            urdu::word_to_number(token).map(u32::from)
        };

        if let Some(value) = value {
            // First number wins, then range-check
            return u8::try_from(value).ok().filter(|v| (1..=9).contains(v));
        }
    }

    None
}

/// Map a free-text scale answer to its sentiment.
pub fn sentiment(text: &str) -> Sentiment {
    match scale_value(text) {
        Some(value) if value <= 4 => Sentiment::Dislike,
        Some(_) => Sentiment::Like,
        None => Sentiment::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dislike_range() {
        for text in ["1", "2", "3", "4"] {
            assert_eq!(sentiment(text), Sentiment::Dislike, "{text}");
        }
    }

    #[test]
    fn test_like_range() {
        for text in ["5", "6", "7", "8", "9"] {
            assert_eq!(sentiment(text), Sentiment::Like, "{text}");
        }
    }

    #[test]
    fn test_urdu_glyph_word_and_transliteration_agree() {
        // "۷", "سات" and "saat" are the same answer
        assert_eq!(scale_value("۷"), Some(7));
        assert_eq!(scale_value("سات"), Some(7));
        assert_eq!(scale_value("saat"), Some(7));
        assert_eq!(sentiment("۷"), Sentiment::Like);
        assert_eq!(sentiment("سات"), Sentiment::Like);
        assert_eq!(sentiment("saat"), Sentiment::Like);
    }

    #[test]
    fn test_number_embedded_in_sentence() {
        assert_eq!(scale_value("مجھے یہ تین لگا"), Some(3));
        assert_eq!(sentiment("میں اسے 8 نمبر دوں گا"), Sentiment::Like);
    }

    #[test]
    fn test_first_number_wins() {
        assert_eq!(scale_value("سات یا آٹھ"), Some(7));
        assert_eq!(scale_value("2 nahi 9"), Some(2));
    }

    #[test]
    fn test_out_of_range_is_invalid() {
        assert_eq!(scale_value("0"), None);
        assert_eq!(scale_value("10"), None);
        assert_eq!(sentiment("پچاس"), Sentiment::Invalid);
    }

    #[test]
    fn test_non_numeric_is_invalid() {
        assert_eq!(sentiment("بہت اچھا لگا"), Sentiment::Invalid);
        assert_eq!(sentiment(""), Sentiment::Invalid);
    }
}
