use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A column name outside the fixed weather/performance catalogue.
    #[error("unrecognized metric: {0}")]
    UnrecognizedMetric(String),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("invalid upper limit: {0}")]
    InvalidUpperLimit(f64),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

impl AnalysisError {
    pub fn unrecognized(name: impl Into<String>) -> Self {
        Self::UnrecognizedMetric(name.into())
    }
}
