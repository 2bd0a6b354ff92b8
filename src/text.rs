//! Diary text preprocessing
//!
//! Normalizes free-text diary input into the canonical token stream the text
//! classifier was trained on: lowercase, URLs removed, only ASCII letters and
//! single spaces remaining.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"http\S+").expect("url regex"));
static RE_NON_LETTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z\s]").expect("non-letter regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Clean a diary entry for vectorization.
///
/// Lowercases, strips URL-like substrings (`http` followed by a run of
/// non-whitespace), strips everything that is not an ASCII letter or
/// whitespace, collapses whitespace runs to single spaces, and trims.
/// Pure and total: never fails, never panics.
pub fn clean(text: &str) -> String {
    let lowered = text.to_lowercase();
    let no_urls = RE_URL.replace_all(&lowered, "");
    let letters_only = RE_NON_LETTER.replace_all(&no_urls, "");
    RE_WS.replace_all(&letters_only, " ").trim().to_string()
}

/// Clean a diary field taken straight from untyped JSON.
///
/// Non-string values (null, numbers, arrays, objects) degrade to the empty
/// string rather than erroring. This is the only silently recovered failure
/// in the pipeline.
pub fn clean_value(value: &serde_json::Value) -> String {
    match value.as_str() {
        Some(s) => clean(s),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(clean("  I Am STRESSED  "), "i am stressed");
    }

    #[test]
    fn strips_urls() {
        assert_eq!(
            clean("see https://example.com/page?x=1 for details"),
            "see for details"
        );
        // Bare "http" run without a scheme separator is still removed
        assert_eq!(clean("link httpfoo bar"), "link bar");
    }

    #[test]
    fn strips_digits_punctuation_and_emoji() {
        assert_eq!(clean("exam in 3 days!!! 😰 so, so tired..."), "exam in days so so tired");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(clean("a\t\tb\n\nc   d"), "a b c d");
    }

    #[test]
    fn empty_and_symbol_only_input() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("123 !!! 😰"), "");
    }

    #[test]
    fn clean_is_idempotent() {
        let once = clean("Today I felt... overwhelmed! https://x.io/a");
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn non_string_json_degrades_to_empty() {
        assert_eq!(clean_value(&serde_json::json!(null)), "");
        assert_eq!(clean_value(&serde_json::json!(42)), "");
        assert_eq!(clean_value(&serde_json::json!(["a"])), "");
        assert_eq!(clean_value(&serde_json::json!("Feeling OK.")), "feeling ok");
    }
}
