use crate::api::{ApiError, ApiResult, ProgressCallback, ProgressEvent};
use crate::gene_metrics::{MetricsCollector, MetricsOptions, ResultTable};
use crate::record_processor::{BamRecordReader, IterSource, ProcessingStats, RecordSource};
use crate::types::AlignmentRecord;
use indicatif::ProgressBar;
use std::path::PathBuf;

const TASK: &str = "Gene Metrics";

pub struct GeneMetricsAnalyzer {
    progress_callback: Option<ProgressCallback>,
}

impl GeneMetricsAnalyzer {
    pub fn new() -> Self {
        Self {
            progress_callback: None,
        }
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Computes metrics for an alignment file.
    pub fn analyze(&self, input: GeneMetricsInput) -> ApiResult<GeneMetricsOutput> {
        self.emit_progress(ProgressEvent::Started {
            task: TASK.to_string(),
        });

        let result = self.run_analysis(input);
        match &result {
            Ok(_) => self.emit_progress(ProgressEvent::Completed {
                task: TASK.to_string(),
            }),
            Err(e) => self.emit_progress(ProgressEvent::Error {
                task: TASK.to_string(),
                error: e.to_string(),
            }),
        }
        result
    }

    /// Computes metrics for records already in memory.
    pub fn analyze_records(
        &self,
        records: Vec<AlignmentRecord>,
        options: MetricsOptions,
        threads: usize,
    ) -> ApiResult<GeneMetricsOutput> {
        let total = records.len() as u64;
        let mut source = IterSource::from_records(records);
        let mut collector = MetricsCollector::new(options);
        let stats = source.read_records_with_threads(
            &mut collector,
            &ProgressBar::hidden(),
            threads,
            crate::config::Config::default().batch_size,
        )?;
        self.emit_progress(ProgressEvent::Progress {
            task: TASK.to_string(),
            current: stats.total(),
            total,
        });

        Ok(GeneMetricsOutput {
            table: collector.finish(),
            stats,
        })
    }

    fn run_analysis(&self, input: GeneMetricsInput) -> ApiResult<GeneMetricsOutput> {
        if !input.bam_file.exists() {
            return Err(ApiError::InvalidInput(format!(
                "{} does not exist",
                input.bam_file.display()
            )));
        }

        let mut reader = BamRecordReader::new(&input.bam_file, input.reference_file.as_deref())
            .map_err(|e| ApiError::BamError(format!("{:#}", e)))?;

        self.emit_progress(ProgressEvent::Message {
            task: TASK.to_string(),
            message: format!("Reading {}", input.bam_file.display()),
        });

        let mut collector = MetricsCollector::new(input.options);
        let stats = reader
            .read_records_with_threads(
                &mut collector,
                &ProgressBar::hidden(),
                input.threads,
                input.batch_size,
            )
            .map_err(|e| ApiError::BamError(format!("{:#}", e)))?;

        Ok(GeneMetricsOutput {
            table: collector.finish(),
            stats,
        })
    }

    fn emit_progress(&self, event: ProgressEvent) {
        if let Some(callback) = &self.progress_callback {
            callback(event);
        }
    }
}

impl Default for GeneMetricsAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct GeneMetricsInput {
    pub bam_file: PathBuf,
    /// Needed only for CRAM input.
    pub reference_file: Option<PathBuf>,
    pub options: MetricsOptions,
    pub threads: usize,
    pub batch_size: usize,
}

impl GeneMetricsInput {
    pub fn new(bam_file: impl Into<PathBuf>) -> Self {
        let config = crate::config::Config::default();
        Self {
            bam_file: bam_file.into(),
            reference_file: None,
            options: MetricsOptions::from(&config),
            threads: config.threads,
            batch_size: config.batch_size,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneMetricsOutput {
    pub table: ResultTable,
    pub stats: ProcessingStats,
}
