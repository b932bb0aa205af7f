// File: src/learning.rs
use crate::core::alphabet::MINIMUM_STRING_LENGTH;
use crate::core::normalizer::StringNormalizer;
use crate::core::types::TrigramCounts;
use crate::error::{Result, StringsError};

/// Builds trigram counts from sample strings, normalizing each sample the
/// same way candidates are normalized before scoring.
pub struct TrigramLearner {
    counts: TrigramCounts,
    fold_lowercase: bool,
    samples: usize,
}

impl TrigramLearner {
    pub fn new(fold_lowercase: bool) -> Self {
        Self {
            counts: TrigramCounts::new(),
            fold_lowercase,
            samples: 0,
        }
    }

    /// Adds `weight` occurrences of one sample. Samples too short to score
    /// are ignored; returns whether the sample was counted. A sample that
    /// would overflow the total is refused whole.
    pub fn learn(&mut self, sample: &str, weight: u64) -> Result<bool> {
        let codes = StringNormalizer::normalize(sample, self.fold_lowercase).codes;
        let n = codes.len();
        if n < MINIMUM_STRING_LENGTH || weight == 0 {
            return Ok(false);
        }

        // One begin pair, n - 3 interior trigrams and one end pair.
        let added = weight.checked_mul(n as u64 - 1);
        if added.and_then(|added| self.counts.total().checked_add(added)).is_none() {
            return Err(StringsError::CountOverflow(weight));
        }

        let overflow = |_| StringsError::CountOverflow(weight);
        self.counts.add_begin(codes[0], codes[1], weight).map_err(overflow)?;
        for window in codes[1..].windows(3) {
            self.counts
                .add_trigram(window[0], window[1], window[2], weight)
                .map_err(overflow)?;
        }
        self.counts.add_end(codes[n - 2], codes[n - 1], weight).map_err(overflow)?;

        self.samples += 1;
        Ok(true)
    }

    /// Learns every non-empty line with weight 1.
    pub fn learn_corpus(&mut self, corpus: &str) -> Result<usize> {
        let mut learned = 0;
        for line in corpus.lines() {
            if self.learn(line, 1)? {
                learned += 1;
            }
        }
        Ok(learned)
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn counts(&self) -> &TrigramCounts {
        &self.counts
    }

    pub fn into_counts(self) -> TrigramCounts {
        self.counts
    }
}
