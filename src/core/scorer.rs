// File: src/core/scorer.rs
use crate::core::alphabet::{threshold_for, DEFAULT_LOG_VALUE, MINIMUM_STRING_LENGTH};
use crate::core::model::LanguageModel;
use crate::core::types::ScoreResult;
use crate::error::Result;

/// Scores code sequences against a borrowed model.
pub struct TrigramScorer<'a> {
    model: &'a LanguageModel,
}

impl<'a> TrigramScorer<'a> {
    pub fn new(model: &'a LanguageModel) -> Self {
        Self { model }
    }

    /// Mean log10 likelihood per character, compared against the threshold
    /// calibrated for this length.
    pub fn score(&self, codes: &[u8]) -> Result<ScoreResult> {
        let score = if codes.len() < MINIMUM_STRING_LENGTH {
            DEFAULT_LOG_VALUE
        } else {
            self.mean_log_likelihood(codes)?
        };
        let threshold = threshold_for(codes.len());

        Ok(ScoreResult {
            score,
            threshold,
            is_valid: passes(score, threshold),
        })
    }

    // codes.len() >= 3
    fn mean_log_likelihood(&self, codes: &[u8]) -> Result<f64> {
        let n = codes.len();
        let mut sum = self.model.begin_prob(codes[0], codes[1])?;

        for window in codes[1..].windows(3) {
            sum += self.model.trigram_prob(window[0], window[1], window[2])?;
        }

        sum += self.model.end_prob(codes[n - 2], codes[n - 1])?;
        Ok(sum / n as f64)
    }
}

// A score equal to its threshold is rejected.
#[inline]
fn passes(score: f64, threshold: f64) -> bool {
    score > threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TrigramCounts;
    use crate::error::StringsError;

    fn model_for(word: &[u8], weight: u64) -> LanguageModel {
        let mut counts = TrigramCounts::new();
        counts.add_begin(word[0], word[1], weight).unwrap();
        for w in word[1..].windows(3) {
            counts.add_trigram(w[0], w[1], w[2], weight).unwrap();
        }
        counts.add_end(word[word.len() - 2], word[word.len() - 1], weight).unwrap();
        LanguageModel::build(&counts, "lowercase")
    }

    #[test]
    fn short_sequences_get_default_score() {
        let model = model_for(b"abc", 10);
        let scorer = TrigramScorer::new(&model);
        for codes in [&b""[..], &b"a"[..], &b"ab"[..]] {
            let result = scorer.score(codes).unwrap();
            assert_eq!(result.score, DEFAULT_LOG_VALUE);
            assert_eq!(result.threshold, 10.0);
            assert!(!result.is_valid);
        }
    }

    #[test]
    fn sums_begin_interior_and_end_terms() {
        let model = model_for(b"hello", 1000);
        let scorer = TrigramScorer::new(&model);

        let expected = (model.begin_prob(b'h', b'e').unwrap()
            + model.trigram_prob(b'e', b'l', b'l').unwrap()
            + model.trigram_prob(b'l', b'l', b'o').unwrap()
            + model.end_prob(b'l', b'o').unwrap())
            / 5.0;

        let result = scorer.score(b"hello").unwrap();
        assert!((result.score - expected).abs() < 1e-12);
        assert_eq!(result.threshold, -3.26);
    }

    #[test]
    fn three_codes_use_no_interior_trigram() {
        let model = model_for(b"abc", 1000);
        let scorer = TrigramScorer::new(&model);
        let expected =
            (model.begin_prob(b'a', b'b').unwrap() + model.end_prob(b'b', b'c').unwrap()) / 3.0;
        let result = scorer.score(b"abc").unwrap();
        assert!((result.score - expected).abs() < 1e-12);
        // Length 3 can never pass.
        assert!(!result.is_valid);
    }

    #[test]
    fn trained_word_passes_and_unseen_word_fails() {
        let model = model_for(b"hello", 50_000_000);
        let scorer = TrigramScorer::new(&model);
        assert!(scorer.score(b"hello").unwrap().is_valid);
        assert!(!scorer.score(b"qxzvj").unwrap().is_valid);
    }

    #[test]
    fn score_equal_to_threshold_is_rejected() {
        let threshold = threshold_for(5);
        assert!(!passes(threshold, threshold));
        assert!(passes(threshold + 1e-9, threshold));
        assert!(!passes(threshold - 1e-9, threshold));
    }

    #[test]
    fn long_sequences_use_ceiling_threshold() {
        let model = model_for(b"abc", 1);
        let scorer = TrigramScorer::new(&model);
        let codes = vec![b'a'; 150];
        assert_eq!(scorer.score(&codes).unwrap().threshold, -6.3);
    }

    #[test]
    fn rejects_out_of_range_codes() {
        let model = model_for(b"abc", 1);
        let scorer = TrigramScorer::new(&model);
        assert!(matches!(
            scorer.score(&[b'a', 200, b'c']),
            Err(StringsError::CodeOutOfRange(200))
        ));
    }
}
