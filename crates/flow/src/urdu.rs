//! Urdu number utilities
//!
//! Respondents answer scale questions with digit glyphs, Urdu number words,
//! or Latin transliterations, and the transcription layer is free to produce
//! any of them. Everything funnels through these two functions before the
//! sentiment mapper sees a value.

/// Convert Urdu digit glyphs to ASCII digits.
///
/// Handles both Extended Arabic-Indic (U+06F0 - U+06F9, the usual Urdu forms)
/// and Arabic-Indic (U+0660 - U+0669), which some transcriptions emit instead.
/// All other characters pass through unchanged.
pub fn urdu_numerals_to_ascii(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            // Extended Arabic-Indic (Urdu)
            '۰' => '0',
            '۱' => '1',
            '۲' => '2',
            '۳' => '3',
            '۴' => '4',
            '۵' => '5',
            '۶' => '6',
            '۷' => '7',
            '۸' => '8',
            '۹' => '9',

            // Arabic-Indic
            '٠' => '0',
            '١' => '1',
            '٢' => '2',
            '٣' => '3',
            '٤' => '4',
            '٥' => '5',
            '٦' => '6',
            '٧' => '7',
            '٨' => '8',
            '٩' => '9',

            _ => c,
        })
        .collect()
}

/// Convert an Urdu number word (or its Latin transliteration) to a value.
///
/// Covers 1-9, the range the scale questions use, with the spelling variants
/// that show up in transcriptions. Latin forms are matched lowercase.
///
/// # Examples
/// ```
/// use survey_agent_flow::urdu::word_to_number;
/// assert_eq!(word_to_number("سات"), Some(7));
/// assert_eq!(word_to_number("saat"), Some(7));
/// assert_eq!(word_to_number("شکریہ"), None);
/// ```
pub fn word_to_number(word: &str) -> Option<u8> {
    match word.to_lowercase().as_str() {
        "ایک" | "اک" | "ek" | "aik" | "ik" => Some(1),
        "دو" | "do" => Some(2),
        "تین" | "teen" | "tin" => Some(3),
        "چار" | "char" | "chaar" | "chār" => Some(4),
        "پانچ" | "پانج" | "panch" | "paanch" | "panj" => Some(5),
        "چھ" | "چھے" | "چھہ" | "che" | "chhe" | "chay" | "chhay" | "cheh" => Some(6),
        "سات" | "saat" | "sat" => Some(7),
        "آٹھ" | "اٹھ" | "aath" | "ath" | "aat" => Some(8),
        "نو" | "نہو" | "nau" | "nao" | "nou" => Some(9),
        _ => None,
    }
}
