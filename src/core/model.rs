// File: src/core/model.rs
use crate::core::alphabet::{ALPHABET_SIZE, LOWERCASE_MODEL_TYPE};
use crate::core::types::{bigram_index, trigram_index, TrigramCounts, BIGRAM_CELLS, TRIGRAM_CELLS};
use crate::error::{Result, StringsError};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Immutable trigram language model holding log10 probabilities.
///
/// All three tables are normalized by the same grand total, so summing
/// entries along a string approximates a joint log-likelihood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageModel {
    trigram_probs: Vec<f64>,
    begin_probs: Vec<f64>,
    end_probs: Vec<f64>,
    model_type: String,
    is_lowercase: bool,
}

impl LanguageModel {
    /// Builds a model from raw counts with add-one smoothing on zero cells.
    /// The caller's counts are left untouched.
    pub fn build(counts: &TrigramCounts, model_type: &str) -> Self {
        let mut trigram_counts = counts.trigrams.clone();
        let mut begin_counts = counts.begin.clone();
        let mut end_counts = counts.end.clone();
        let mut total = counts.total;

        for table in [&mut trigram_counts, &mut begin_counts, &mut end_counts] {
            for cell in table.iter_mut().filter(|cell| **cell == 0) {
                *cell = 1;
                total = total.saturating_add(1);
            }
        }

        let denominator = total as f64;
        let to_log = |table: Vec<u64>| -> Vec<f64> {
            table
                .into_iter()
                .map(|count| (count as f64 / denominator).log10())
                .collect()
        };

        info!(model_type, grand_total = total, "built trigram model");

        Self {
            trigram_probs: to_log(trigram_counts),
            begin_probs: to_log(begin_counts),
            end_probs: to_log(end_counts),
            model_type: model_type.to_string(),
            is_lowercase: model_type.to_lowercase() == LOWERCASE_MODEL_TYPE,
        }
    }

    pub fn trigram_prob(&self, a: u8, b: u8, c: u8) -> Result<f64> {
        check_codes(&[a, b, c])?;
        Ok(self.trigram_probs[trigram_index(a, b, c)])
    }

    /// Log probability of a string starting with `a`, `b`.
    pub fn begin_prob(&self, a: u8, b: u8) -> Result<f64> {
        check_codes(&[a, b])?;
        Ok(self.begin_probs[bigram_index(a, b)])
    }

    /// Log probability of a string ending with `a`, `b`.
    pub fn end_prob(&self, a: u8, b: u8) -> Result<f64> {
        check_codes(&[a, b])?;
        Ok(self.end_probs[bigram_index(a, b)])
    }

    pub fn model_type(&self) -> &str {
        &self.model_type
    }

    pub fn is_lowercase_model(&self) -> bool {
        self.is_lowercase
    }

    /// Iterates every probability cell across the three tables.
    pub fn cells(&self) -> impl Iterator<Item = f64> + '_ {
        self.trigram_probs
            .iter()
            .chain(self.begin_probs.iter())
            .chain(self.end_probs.iter())
            .copied()
    }

    /// Confirms table shapes after deserialization.
    pub(crate) fn validate_shape(&self) -> Result<()> {
        if self.trigram_probs.len() != TRIGRAM_CELLS
            || self.begin_probs.len() != BIGRAM_CELLS
            || self.end_probs.len() != BIGRAM_CELLS
        {
            return Err(StringsError::Snapshot(
                "probability tables have the wrong dimensions".to_string(),
            ));
        }
        if self.is_lowercase != (self.model_type.to_lowercase() == LOWERCASE_MODEL_TYPE) {
            return Err(StringsError::Snapshot(
                "case-folding flag disagrees with model type".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_codes(codes: &[u8]) -> Result<()> {
    match codes.iter().find(|&&code| code as usize >= ALPHABET_SIZE) {
        Some(&code) => Err(StringsError::CodeOutOfRange(code as u32)),
        None => Ok(()),
    }
}
