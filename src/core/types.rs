// src/core/types.rs
use crate::core::alphabet::ALPHABET_SIZE;
use crate::error::LineError;
use serde::{Deserialize, Serialize};

/// Cells in the regular trigram table.
pub const TRIGRAM_CELLS: usize = ALPHABET_SIZE * ALPHABET_SIZE * ALPHABET_SIZE;
/// Cells in each of the begin/end tables.
pub const BIGRAM_CELLS: usize = ALPHABET_SIZE * ALPHABET_SIZE;

#[inline]
pub(crate) fn trigram_index(a: u8, b: u8, c: u8) -> usize {
    (a as usize) * BIGRAM_CELLS + (b as usize) * ALPHABET_SIZE + c as usize
}

#[inline]
pub(crate) fn bigram_index(a: u8, b: u8) -> usize {
    (a as usize) * ALPHABET_SIZE + b as usize
}

/// Raw frequencies read from a model file or learned from a corpus.
/// Tables are flat buffers; see [`trigram_index`] and [`bigram_index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrigramCounts {
    pub(crate) trigrams: Vec<u64>,
    pub(crate) begin: Vec<u64>,
    pub(crate) end: Vec<u64>,
    pub(crate) total: u64,
}

impl TrigramCounts {
    pub fn new() -> Self {
        Self {
            trigrams: vec![0; TRIGRAM_CELLS],
            begin: vec![0; BIGRAM_CELLS],
            end: vec![0; BIGRAM_CELLS],
            total: 0,
        }
    }

    // Callers pass codes already checked against the alphabet. A count is
    // only stored once the total has room for it, and no cell can exceed
    // the total.
    pub(crate) fn add_trigram(&mut self, a: u8, b: u8, c: u8, count: u64) -> Result<(), LineError> {
        self.grow_total(count)?;
        self.trigrams[trigram_index(a, b, c)] += count;
        Ok(())
    }

    pub(crate) fn add_begin(&mut self, a: u8, b: u8, count: u64) -> Result<(), LineError> {
        self.grow_total(count)?;
        self.begin[bigram_index(a, b)] += count;
        Ok(())
    }

    pub(crate) fn add_end(&mut self, a: u8, b: u8, count: u64) -> Result<(), LineError> {
        self.grow_total(count)?;
        self.end[bigram_index(a, b)] += count;
        Ok(())
    }

    /// Counts a line that occupies no table cell (a single-character string).
    pub(crate) fn add_untabled(&mut self, count: u64) -> Result<(), LineError> {
        self.grow_total(count)
    }

    fn grow_total(&mut self, count: u64) -> Result<(), LineError> {
        self.total = self.total.checked_add(count).ok_or(LineError::CountOverflow(count))?;
        Ok(())
    }

    pub fn trigram(&self, a: u8, b: u8, c: u8) -> u64 {
        self.trigrams[trigram_index(a, b, c)]
    }

    pub fn begin(&self, a: u8, b: u8) -> u64 {
        self.begin[bigram_index(a, b)]
    }

    pub fn end(&self, a: u8, b: u8) -> u64 {
        self.end[bigram_index(a, b)]
    }

    /// Sum of every accepted count, including ones with no table cell.
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl Default for TrigramCounts {
    fn default() -> Self {
        Self::new()
    }
}

/// A candidate after case folding and whitespace normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCandidate {
    pub original: String,
    pub normalized: String,
    /// Ordinal of each normalized character, always below 128.
    pub codes: Vec<u8>,
}

/// Verdict of the scorer for one code sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    pub score: f64,
    pub threshold: f64,
    pub is_valid: bool,
}

/// One analyzed candidate as handed to callers and reporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub original_string: String,
    pub score: f64,
    pub threshold: f64,
    pub is_valid: bool,
    pub normalized_string: String,
    /// Byte offset of the candidate in the scanned buffer, if it came from one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    #[serde(rename = "type")]
    pub model_type: String,
    pub is_lowercase: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflowing_count_is_refused_without_side_effects() {
        let mut counts = TrigramCounts::new();
        counts.add_trigram(b'a', b'b', b'c', u64::MAX - 1).unwrap();

        assert_eq!(counts.add_end(b'x', b'y', 2), Err(LineError::CountOverflow(2)));
        assert_eq!(counts.add_untabled(5), Err(LineError::CountOverflow(5)));
        assert_eq!(counts.end(b'x', b'y'), 0);
        assert_eq!(counts.total(), u64::MAX - 1);

        counts.add_begin(b'x', b'y', 1).unwrap();
        assert_eq!(counts.total(), u64::MAX);
    }
}
