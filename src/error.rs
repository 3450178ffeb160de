//! Error types for the basket analysis pipeline
//!
//! Every error is fatal to a run. Empty results (no frequent itemsets, no
//! rules) are not errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input or output file could not be opened, read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV (bad quoting, ragged rows, invalid UTF-8)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Required column absent from the CSV header
    #[error("{origin}: missing required column '{column}'")]
    MissingColumn { origin: String, column: String },

    /// A field could not be parsed into the expected type
    #[error("{origin}:{line}: invalid value '{value}' in column '{column}'")]
    InvalidField {
        origin: String,
        line: u64,
        column: String,
        value: String,
    },

    /// Mining threshold outside its valid range
    #[error("invalid {name}: {value} (expected {expected})")]
    InvalidThreshold {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// The worker pool backing a session could not be started
    #[error("session error: {0}")]
    Session(String),

    /// Inconsistent or incomplete configuration
    #[error("configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Attach a path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
