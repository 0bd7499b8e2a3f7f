use crate::gene_metrics::{GeneMetricsRow, MetricsOptions, ResultTable, ScalarSummary};
use crate::record_processor::ProcessingStats;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct GeneMetricsExport {
    pub parameters: GeneMetricsParameters,
    pub statistics: GeneMetricsStatistics,
    pub summary: ScalarSummary,
    pub genes: Vec<GeneMetricsRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneMetricsParameters {
    pub umi_quality_threshold: u8,
    pub genomic_quality_threshold: u8,
    pub min_mapping_quality: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneMetricsStatistics {
    pub records_processed: u64,
    pub records_skipped: u64,
    pub records_filtered: u64,
}

impl GeneMetricsExport {
    pub fn new(table: &ResultTable, options: &MetricsOptions, stats: &ProcessingStats) -> Self {
        Self {
            parameters: GeneMetricsParameters {
                umi_quality_threshold: options.thresholds.umi_quality,
                genomic_quality_threshold: options.thresholds.genomic_quality,
                min_mapping_quality: options.min_mapping_quality,
            },
            statistics: GeneMetricsStatistics {
                records_processed: stats.processed,
                records_skipped: stats.skipped,
                records_filtered: stats.filtered,
            },
            summary: table.summary.clone(),
            genes: table.genes.clone(),
        }
    }
}
