//! Text serialization of [`ResultTable`]s.
//!
//! The summary is a header-less two-column CSV (`name,value`). The gene table is a
//! CSV with a header row whose first column is `gene`; undefined values are written
//! as `NaN`.

use super::assembler::{GeneMetricsRow, ResultTable, ScalarSummary};
use super::table::{summary_cell, Cell, MetricTable, GENE_TABLE_COLUMNS, SUMMARY_VALUE_COLUMN};
use anyhow::{Context, Result};
use niffler::get_reader;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub fn write_summary<W: Write>(summary: &ScalarSummary, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for (name, value) in summary.rows() {
        csv_writer.write_record([name, value.as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_gene_table<W: Write>(rows: &[GeneMetricsRow], writer: W) -> Result<()> {
    // Header is written by hand so that an empty table still has one.
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(GENE_TABLE_COLUMNS)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn read_gene_rows<R: Read>(reader: R) -> Result<Vec<GeneMetricsRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let rows = csv_reader
        .deserialize()
        .collect::<Result<Vec<GeneMetricsRow>, _>>()
        .context("Failed to parse gene metrics table")?;
    Ok(rows)
}

/// Reads any keyed table with a header row; the first column holds the row key.
pub fn read_keyed_table<R: Read>(reader: R) -> Result<MetricTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut table = MetricTable::new(headers.iter().skip(1));
    for (line, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed table row {}", line + 2))?;
        let key = record.get(0).unwrap_or_default().to_string();
        table.push_row(key, record.iter().skip(1).map(Cell::parse).collect());
    }
    Ok(table)
}

/// Reads a header-less `name,value` summary.
pub fn read_summary_table<R: Read>(reader: R) -> Result<MetricTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut table = MetricTable::new([SUMMARY_VALUE_COLUMN]);
    for (line, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed summary row {}", line + 1))?;
        let name = record.get(0).unwrap_or_default().to_string();
        let value = record
            .get(1)
            .map(|raw| summary_cell(&name, raw))
            .into_iter()
            .collect();
        table.push_row(name, value);
    }
    Ok(table)
}

/// Opens a table for reading, transparently decompressing gzip/bzip2/xz input.
pub fn open_table(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let (reader, _compression) = get_reader(Box::new(BufReader::new(file)))
        .with_context(|| format!("Failed to detect compression of {}", path.display()))?;
    Ok(reader)
}

/// Output locations for one run.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub summary: PathBuf,
    pub genes: PathBuf,
}

impl ReportPaths {
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            summary: PathBuf::from(format!("{prefix}.summary.csv")),
            genes: PathBuf::from(format!("{prefix}.genes.csv")),
        }
    }
}

pub fn write_result_table(table: &ResultTable, paths: &ReportPaths) -> Result<()> {
    let summary = File::create(&paths.summary)
        .with_context(|| format!("Failed to create {}", paths.summary.display()))?;
    write_summary(&table.summary, BufWriter::new(summary))?;

    let genes = File::create(&paths.genes)
        .with_context(|| format!("Failed to create {}", paths.genes.display()))?;
    write_gene_table(&table.genes, BufWriter::new(genes))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene_metrics::table::gene_table;
    use crate::gene_metrics::tolerance::ToleranceComparator;

    fn row(gene: &str, variance: f64) -> GeneMetricsRow {
        GeneMetricsRow {
            gene: gene.into(),
            n_reads: 3,
            n_molecules: 2,
            n_fragments: 3,
            reads_per_molecule: 1.5,
            reads_per_fragment: 1.0,
            fragments_per_molecule: 1.5,
            fragments_with_single_read_evidence: 3,
            molecules_with_single_read_evidence: 1,
            perfect_molecule_barcodes: 3,
            reads_mapped_exonic: 2,
            reads_mapped_intronic: 1,
            reads_mapped_utr: 0,
            reads_mapped_uniquely: 3,
            reads_mapped_multiple: 0,
            duplicate_reads: 1,
            spliced_reads: 0,
            molecule_barcode_fraction_bases_above_30_mean: 0.9,
            molecule_barcode_fraction_bases_above_30_variance: variance,
            genomic_reads_fraction_bases_quality_above_30_mean: 0.1 + 0.2,
            genomic_reads_fraction_bases_quality_above_30_variance: variance,
            genomic_read_quality_mean: 35.25,
            genomic_read_quality_variance: variance,
        }
    }

    #[test]
    fn summary_is_headerless_name_value_pairs() {
        let summary = ScalarSummary {
            n_reads: 12,
            most_abundant_gene: "MALAT1".into(),
            most_abundant_gene_reads: 7,
            ..Default::default()
        };
        let mut buffer = Vec::new();
        write_summary(&summary, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "n_reads,12");
        assert!(lines.contains(&"most_abundant_gene,MALAT1"));
        assert!(lines.contains(&"most_abundant_gene_reads,7"));
        assert!(!text.contains('.'));
    }

    #[test]
    fn numeric_gene_name_survives_summary_round_trip() {
        let summary = ScalarSummary {
            most_abundant_gene: "1".into(),
            most_abundant_gene_reads: 4,
            ..Default::default()
        };
        let mut buffer = Vec::new();
        write_summary(&summary, &mut buffer).unwrap();

        let read_back = read_summary_table(buffer.as_slice()).unwrap();
        assert_eq!(
            read_back.get("most_abundant_gene", SUMMARY_VALUE_COLUMN),
            Some(&Cell::Text("1".into()))
        );
        let comparison = ToleranceComparator::default()
            .compare(&crate::gene_metrics::table::summary_table(&summary), &read_back);
        assert!(comparison.passed(), "{:?}", comparison.mismatches);
    }

    #[test]
    fn gene_table_writes_nan_marker_and_header() {
        let mut buffer = Vec::new();
        write_gene_table(&[row("ACTB", f64::NAN)], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), GENE_TABLE_COLUMNS.join(","));
        let data = lines.next().unwrap();
        assert!(data.starts_with("ACTB,3,2,3,1.5,"));
        assert!(data.ends_with(",NaN"));
        assert!(!data.contains(",,"));
    }

    #[test]
    fn empty_gene_table_still_has_header() {
        let mut buffer = Vec::new();
        write_gene_table(&[], &mut buffer).unwrap();
        let table = read_keyed_table(buffer.as_slice()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), GENE_TABLE_COLUMNS.len() - 1);
    }

    #[test]
    fn gene_rows_survive_a_round_trip() {
        let rows = vec![row("ACTB", 0.012345678901234), row("MALAT1", f64::NAN)];
        let mut buffer = Vec::new();
        write_gene_table(&rows, &mut buffer).unwrap();

        let parsed = read_gene_rows(buffer.as_slice()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].genomic_read_quality_variance, 0.012345678901234);
        assert!(parsed[1].genomic_read_quality_variance.is_nan());

        let keyed = read_keyed_table(buffer.as_slice()).unwrap();
        let comparison = ToleranceComparator::default().compare(&gene_table(&rows), &keyed);
        assert!(comparison.passed(), "{:?}", comparison.mismatches);
    }
}
