use crate::core::model::LanguageModel;
use crate::core::normalizer::StringNormalizer;
use crate::core::scorer::TrigramScorer;
use crate::core::types::{AnalysisResult, ModelInfo};
use crate::error::{Result, StringsError};
use crate::parser::{parse_model_file, parse_model_str};
use crate::persistence::load_compiled;
use crate::scan::extract_strings;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where a model comes from.
#[derive(Debug, Clone)]
pub enum ModelSource {
    /// A model file on disk, parsed strictly.
    Path(PathBuf),
    /// Model file text already in memory, parsed leniently.
    Content(String),
    /// A snapshot written by [`crate::persistence::save_compiled`].
    Compiled(PathBuf),
}

// The analyzer owns at most one model. `None` means nothing has been loaded
// yet and every analysis call is refused.
#[derive(Debug, Default)]
pub struct StringAnalyzer {
    model: Option<LanguageModel>,
}

impl StringAnalyzer {
    pub fn new() -> Self {
        Self { model: None }
    }

    pub fn with_model(model: LanguageModel) -> Self {
        Self { model: Some(model) }
    }

    /// Loads and builds a model. On failure any previously loaded model stays.
    pub fn load_model(&mut self, source: ModelSource) -> Result<()> {
        let model = match source {
            ModelSource::Path(path) => {
                info!(path = %path.display(), "parsing model file");
                let (counts, model_type) = parse_model_file(&path)?;
                LanguageModel::build(&counts, &model_type)
            }
            ModelSource::Content(content) => {
                let (counts, model_type) = parse_model_str(&content)?;
                LanguageModel::build(&counts, &model_type)
            }
            ModelSource::Compiled(path) => {
                info!(path = %path.display(), "loading compiled model");
                load_compiled(&path)?
            }
        };

        self.model = Some(model);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&LanguageModel> {
        self.model.as_ref()
    }

    fn loaded_model(&self, action: &'static str) -> Result<&LanguageModel> {
        self.model.as_ref().ok_or(StringsError::ModelNotLoaded(action))
    }

    pub fn analyze_string(&self, candidate: &str, offset: Option<usize>) -> Result<AnalysisResult> {
        let model = self.loaded_model("analyzing strings")?;
        Self::analyze_with(model, candidate, offset)
    }

    fn analyze_with(
        model: &LanguageModel,
        candidate: &str,
        offset: Option<usize>,
    ) -> Result<AnalysisResult> {
        let normalized = StringNormalizer::normalize(candidate, model.is_lowercase_model());
        let verdict = TrigramScorer::new(model).score(&normalized.codes)?;

        Ok(AnalysisResult {
            original_string: normalized.original,
            score: verdict.score,
            threshold: verdict.threshold,
            is_valid: verdict.is_valid,
            normalized_string: normalized.normalized,
            offset,
        })
    }

    /// Scores every candidate, in input order.
    pub fn analyze_strings<S: AsRef<str>>(&self, candidates: &[S]) -> Result<Vec<AnalysisResult>> {
        let model = self.loaded_model("analyzing strings")?;
        candidates
            .iter()
            .map(|candidate| Self::analyze_with(model, candidate.as_ref(), None))
            .collect()
    }

    /// Like [`Self::analyze_strings`] but keeps only accepted candidates.
    pub fn extract_valid_strings<S: AsRef<str>>(
        &self,
        candidates: &[S],
    ) -> Result<Vec<AnalysisResult>> {
        let mut results = self.analyze_strings(candidates)?;
        results.retain(|result| result.is_valid);
        Ok(results)
    }

    pub fn model_info(&self) -> Result<ModelInfo> {
        let model = self.loaded_model("getting model info")?;
        Ok(ModelInfo {
            model_type: model.model_type().to_string(),
            is_lowercase: model.is_lowercase_model(),
        })
    }

    /// Scans a byte buffer for printable runs and scores each one, keeping
    /// rejected runs as well.
    pub fn analyze_binary(&self, bytes: &[u8], min_length: usize) -> Result<Vec<AnalysisResult>> {
        let model = self.loaded_model("analyzing binary data")?;
        let runs = extract_strings(bytes, min_length);
        debug!(candidates = runs.len(), min_length, "extracted printable runs");

        runs.iter()
            .map(|run| Self::analyze_with(model, &run.text, Some(run.offset)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY_MODEL: &str = "# Model Type: lowercase\n\
        [^]\th\te\t500000\n\
        h\te\tl\t500000\n\
        e\tl\tl\t500000\n\
        l\tl\to\t500000\n\
        l\to\t[$]\t500000\n";

    fn loaded() -> StringAnalyzer {
        let mut analyzer = StringAnalyzer::new();
        analyzer.load_model(ModelSource::Content(TINY_MODEL.to_string())).unwrap();
        analyzer
    }

    #[test]
    fn refuses_work_before_loading() {
        let analyzer = StringAnalyzer::new();
        assert!(!analyzer.is_loaded());
        let not_loaded = |err: StringsError| matches!(err, StringsError::ModelNotLoaded(_));
        assert!(not_loaded(analyzer.analyze_string("hello", None).unwrap_err()));
        assert!(not_loaded(analyzer.analyze_strings(&["hello"]).unwrap_err()));
        assert!(not_loaded(analyzer.model_info().unwrap_err()));
        assert!(not_loaded(analyzer.analyze_binary(b"hello", 4).unwrap_err()));
    }

    #[test]
    fn reports_model_info() {
        let info = loaded().model_info().unwrap();
        assert_eq!(info.model_type, "lowercase");
        assert!(info.is_lowercase);
    }

    #[test]
    fn analyzes_with_folding_and_offset() {
        let analyzer = loaded();
        let result = analyzer.analyze_string("  HELLO ", Some(42)).unwrap();
        assert_eq!(result.original_string, "  HELLO ");
        assert_eq!(result.normalized_string, "hello");
        assert_eq!(result.offset, Some(42));
        assert!(result.is_valid);
        assert!(result.score > result.threshold);
    }

    #[test]
    fn batch_preserves_input_order() {
        let analyzer = loaded();
        let inputs = ["zzzz", "hello", "ab", "hello"];
        let results = analyzer.analyze_strings(&inputs).unwrap();
        let originals: Vec<&str> = results.iter().map(|r| r.original_string.as_str()).collect();
        assert_eq!(originals, inputs);
        assert!(results.iter().all(|r| r.offset.is_none()));
        assert_eq!(results[2].score, -20.0);

        let valid = analyzer.extract_valid_strings(&inputs).unwrap();
        assert_eq!(valid.len(), 2);
        assert!(valid.iter().all(|r| r.original_string == "hello"));
    }

    #[test]
    fn failed_load_keeps_previous_model() {
        let mut analyzer = loaded();
        let err = analyzer
            .load_model(ModelSource::Content("a\tb\tc\t1\n".to_string()))
            .unwrap_err();
        assert!(matches!(err, StringsError::MissingHeader));
        assert!(analyzer.analyze_string("hello", None).unwrap().is_valid);
    }

    #[test]
    fn binary_runs_carry_offsets() {
        let analyzer = loaded();
        let mut bytes = vec![0u8, 0xff];
        bytes.extend_from_slice(b"hello");
        bytes.push(0);
        bytes.extend_from_slice(b"q#@!x");
        let results = analyzer.analyze_binary(&bytes, 4).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].offset, Some(2));
        assert!(results[0].is_valid);
        assert_eq!(results[1].offset, Some(8));
        assert!(!results[1].is_valid);
    }

    #[test]
    fn shared_model_scores_from_many_threads() {
        let analyzer = loaded();
        let expected = analyzer.analyze_string("hello", None).unwrap();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    assert_eq!(analyzer.analyze_string("hello", None).unwrap(), expected);
                });
            }
        });
    }
}
