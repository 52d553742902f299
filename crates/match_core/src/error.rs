use thiserror::Error;

/// Fatal errors raised by the analysis engine.
///
/// Per-frame data gaps (missing ball position, unassigned team at a change)
/// are never reported here; they are absorbed and counted in
/// [`crate::stats::DataQuality`] instead.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Length mismatch: {what} has {found} frames, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid team label {value} at frame {frame} (expected 1, 2 or -1)")]
    InvalidLabel { frame: usize, value: i64 },

    #[error("Invalid possessor id {value} at frame {frame}")]
    InvalidPossessor { frame: usize, value: i64 },

    #[error("Too many frames: {frames} exceeds limit of {limit}")]
    TooManyFrames { frames: usize, limit: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl AnalysisError {
    /// Whether retrying with corrected input or settings can succeed without
    /// changing the data itself.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AnalysisError::Io(_) => true,
            AnalysisError::Configuration(_) => true,
            AnalysisError::TooManyFrames { .. } => true,
            AnalysisError::LengthMismatch { .. } => false,
            AnalysisError::InvalidLabel { .. } => false,
            AnalysisError::InvalidPossessor { .. } => false,
            AnalysisError::Parse(_) => false,
        }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::Parse(err.to_string())
    }
}

impl From<serde_yaml::Error> for AnalysisError {
    fn from(err: serde_yaml::Error) -> Self {
        AnalysisError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
