pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod gene_metrics;
pub mod record_processor;
pub mod types;
mod utils;

// Re-export main API
pub use api::{
    ApiError, ApiResult, GeneMetricsAnalyzer, GeneMetricsInput, GeneMetricsOutput, ProgressCallback,
    ProgressEvent,
};
pub use error::RecordError;
