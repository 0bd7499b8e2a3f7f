pub mod compare;
pub mod gene_metrics;

pub use compare::{compare_table_files, TableKind};
pub use gene_metrics::{GeneMetricsAnalyzer, GeneMetricsInput, GeneMetricsOutput};

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Progress callback for embedding applications
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Progress events that can be sent to an embedding application or the CLI
#[derive(Clone, Debug)]
pub enum ProgressEvent {
    Started { task: String },
    Progress { task: String, current: u64, total: u64 },
    Message { task: String, message: String },
    Completed { task: String },
    Error { task: String, error: String },
}

/// Result types that can be serialized to JSON
pub type ApiResult<T> = Result<T, ApiError>;

/// API-level errors
#[derive(Debug, Error, Serialize)]
pub enum ApiError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("BAM/CRAM error: {0}")]
    BamError(String),

    #[error("Table error: {0}")]
    Table(String),
}

impl From<String> for ApiError {
    fn from(s: String) -> Self {
        ApiError::Analysis(s)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Io(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Analysis(format!("{:#}", err))
    }
}
