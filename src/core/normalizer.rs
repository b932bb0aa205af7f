// File: src/core/normalizer.rs
use crate::core::types::NormalizedCandidate;

const REPLACEMENT: char = ' ';

/// Turns arbitrary candidate text into the canonical form the model scores.
pub struct StringNormalizer;

impl StringNormalizer {
    /// Folds case (for lowercase models), blanks out non-ASCII characters,
    /// trims, and collapses runs of spaces and runs of tabs.
    pub fn normalize(text: &str, fold_lowercase: bool) -> NormalizedCandidate {
        let folded = if fold_lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let ascii: String = if folded.is_ascii() {
            folded
        } else {
            folded
                .chars()
                .map(|c| if c.is_ascii() { c } else { REPLACEMENT })
                .collect()
        };

        let normalized = collapse_runs(ascii.trim());
        let codes = normalized.bytes().collect();

        NormalizedCandidate {
            original: text.to_string(),
            normalized,
            codes,
        }
    }
}

/// Collapses each run of spaces to one space and each run of tabs to one tab.
fn collapse_runs(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last: Option<char> = None;

    for c in s.chars() {
        let repeated = last == Some(c);
        if !(repeated && (c == ' ' || c == '\t')) {
            result.push(c);
        }
        last = Some(c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_plain_ascii() {
        let c = StringNormalizer::normalize("hello", false);
        assert_eq!(c.original, "hello");
        assert_eq!(c.normalized, "hello");
        assert_eq!(c.codes, vec![104, 101, 108, 108, 111]);
    }

    #[test]
    fn folds_case_only_when_asked() {
        let folded = StringNormalizer::normalize("Hello", true);
        assert_eq!(folded.original, "Hello");
        assert_eq!(folded.normalized, "hello");
        assert_eq!(folded.codes, vec![104, 101, 108, 108, 111]);

        let kept = StringNormalizer::normalize("Hello", false);
        assert_eq!(kept.normalized, "Hello");
        assert_eq!(kept.codes[0], 72);
    }

    #[test]
    fn trims_and_collapses_spaces() {
        let normalized = |text: &str| StringNormalizer::normalize(text, false).normalized;
        assert_eq!(normalized("  hello   world  "), "hello world");
        assert_eq!(normalized("hello    world"), "hello world");
    }

    #[test]
    fn collapses_tabs_separately_from_spaces() {
        let normalized = |text: &str| StringNormalizer::normalize(text, false).normalized;
        assert_eq!(normalized("hello\t\t\tworld"), "hello\tworld");
        assert_eq!(normalized("a \t\t  b"), "a \t b");
    }

    #[test]
    fn replaces_non_ascii_with_space() {
        assert_eq!(StringNormalizer::normalize("h\u{e9}llo", false).normalized, "h llo");
        // Replacement happens before trimming, so edge characters vanish.
        assert_eq!(StringNormalizer::normalize("\u{e9}abc\u{e9}\u{e9}", false).normalized, "abc");
        assert_eq!(StringNormalizer::normalize("ab\u{e9}\u{e9}cd", false).normalized, "ab cd");
    }

    #[test]
    fn codes_stay_in_alphabet() {
        let c = StringNormalizer::normalize("\u{3a9}mega \u{1f600} d\u{e9}j\u{e0} vu \u{7f}", true);
        assert!(c.codes.iter().all(|&code| code < 128));
        assert_eq!(c.codes.len(), c.normalized.len());
    }

    #[test]
    fn empty_input() {
        let c = StringNormalizer::normalize("", true);
        assert!(c.normalized.is_empty());
        assert!(c.codes.is_empty());
        assert!(StringNormalizer::normalize(" \t ", false).codes.is_empty());
    }

    #[test]
    fn idempotent_on_canonical_text() {
        for text in ["hello world", "total %qu", "a\tb c", "file_inherit"] {
            let once = StringNormalizer::normalize(text, false).normalized;
            let twice = StringNormalizer::normalize(&once, false).normalized;
            assert_eq!(once, twice);
        }
    }
}
