use crate::cli::GeneMetricsArgs;
use crate::config::Config;
use crate::export::formats::gene_metrics::GeneMetricsExport;
use crate::export::json::write_json;
use crate::export::{AnalysisData, AnalysisExport, ExportMetadata};
use crate::gene_metrics::report::{write_result_table, ReportPaths};
use crate::gene_metrics::{MetricsCollector, MetricsOptions};
use crate::record_processor::{BamRecordReader, RecordSource};
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use log::info;
use std::fs;

fn resolve_options(args: &GeneMetricsArgs, config: &Config) -> MetricsOptions {
    MetricsOptions::new(
        args.umi_quality_threshold
            .unwrap_or(config.umi_quality_threshold),
        args.genomic_quality_threshold
            .unwrap_or(config.genomic_quality_threshold),
    )
    .with_min_mapping_quality(Some(
        args.min_mapping_quality.unwrap_or(config.min_mapping_quality),
    ))
}

pub fn run(args: GeneMetricsArgs, config: &Config) -> Result<()> {
    let options = resolve_options(&args, config);
    let threads = args.threads.unwrap_or(config.threads);
    let batch_size = args.batch_size.unwrap_or(config.batch_size);

    let mut reader = BamRecordReader::new(&args.bam_file, args.reference.as_deref())?;
    reader.set_threads(threads)?;
    let progress = ProgressBarBuilder::records("Reading").build()?;
    let mut collector = MetricsCollector::new(options.clone());
    let stats = reader.read_records_with_threads(&mut collector, &progress, threads, batch_size)?;
    progress.finish_and_clear();

    let table = collector.finish();
    let paths = ReportPaths::from_prefix(&args.output_prefix);
    if let Some(parent) = paths.summary.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }
    write_result_table(&table, &paths)?;
    info!(
        "Wrote {} and {}",
        paths.summary.display(),
        paths.genes.display()
    );

    if let Some(json_path) = &args.json {
        let export = AnalysisExport::new(
            AnalysisData::GeneMetrics(GeneMetricsExport::new(&table, &options, &stats)),
            ExportMetadata {
                sample_id: args.sample_id.clone(),
                source_file: Some(args.bam_file.display().to_string()),
                tags: Vec::new(),
            },
        );
        write_json(&export, json_path)?;
        info!("Wrote {}", json_path.display());
    }

    let summary = &table.summary;
    println!(
        "Processed {} records ({} skipped, {} filtered)",
        stats.processed, stats.skipped, stats.filtered
    );
    println!(
        "{} genes, {} molecules, {} fragments",
        summary.n_genes, summary.n_molecules, summary.n_fragments
    );
    if !summary.most_abundant_gene.is_empty() {
        println!(
            "Most abundant gene: {} ({} reads)",
            summary.most_abundant_gene, summary.most_abundant_gene_reads
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn command_line_overrides_config() {
        let args = match crate::cli::Args::parse_from([
            "scqc-tools",
            "gene-metrics",
            "in.bam",
            "--genomic-quality-threshold",
            "20",
        ])
        .command
        {
            crate::cli::Commands::GeneMetrics(args) => args,
            _ => unreachable!(),
        };
        let config = Config {
            umi_quality_threshold: 25,
            min_mapping_quality: 5,
            ..Default::default()
        };

        let options = resolve_options(&args, &config);
        assert_eq!(options.thresholds.umi_quality, 25);
        assert_eq!(options.thresholds.genomic_quality, 20);
        assert_eq!(options.min_mapping_quality, 5);
    }
}
