// src/lib.rs

pub mod core;
pub mod error;
pub mod learning;
pub mod parser;
pub mod persistence;
pub mod report;
pub mod scan;

pub use crate::core::engine::{ModelSource, StringAnalyzer};
pub use crate::core::model::LanguageModel;
pub use crate::core::types::{AnalysisResult, ModelInfo, TrigramCounts};
pub use crate::error::{Result, StringsError};
