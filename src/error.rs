// File: src/error.rs
use thiserror::Error;

/// Reasons a single model-file data line is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("expected 4 tab-separated fields, found {0}")]
    FieldCount(usize),

    #[error("unknown character representation '{0}'")]
    UnknownToken(String),

    #[error("character '{0}' is outside the ASCII alphabet")]
    NonAsciiToken(String),

    #[error("sentinel '{token}' cannot appear in position {position}")]
    MisplacedSentinel { token: &'static str, position: usize },

    #[error("invalid count '{0}'")]
    InvalidCount(String),

    #[error("count {0} overflows the model total")]
    CountOverflow(u64),
}

/// Errors raised while loading models or analyzing strings.
#[derive(Error, Debug)]
pub enum StringsError {
    #[error("model must be loaded before {0}")]
    ModelNotLoaded(&'static str),

    #[error("invalid model file line {line}: {reason}")]
    Format { line: usize, reason: LineError },

    #[error("model file does not contain model type")]
    MissingHeader,

    #[error("adding {0} occurrences would overflow the model total")]
    CountOverflow(u64),

    #[error("character code {0} is outside the 128-symbol alphabet")]
    CodeOutOfRange(u32),

    #[error("compiled model is unusable: {0}")]
    Snapshot(String),

    #[error("compiled model could not be decoded: {0}")]
    SnapshotCodec(#[from] bincode::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StringsError>;
