use super::assembler::{GeneMetricsRow, ResultTable, ScalarSummary};
use std::collections::HashMap;
use std::fmt;

/// A single table value as read from or destined for a text table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// Numbers (including `NaN` and `inf`) become [`Cell::Number`], everything else text.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(value) => Cell::Number(value),
            Err(_) => Cell::Text(raw.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            Cell::Text(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(value) => write!(f, "{value}"),
            Cell::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// A keyed table: every row has a key (gene or metric name) and one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricTable {
    columns: Vec<String>,
    rows: Vec<(String, Vec<Cell>)>,
}

impl MetricTable {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Short rows are padded with empty text, long rows truncated,
    /// so ragged input still lines up by column name.
    pub fn push_row(&mut self, key: impl Into<String>, mut cells: Vec<Cell>) {
        cells.resize(self.columns.len(), Cell::Text(String::new()));
        self.rows.push((key.into(), cells));
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[(String, Vec<Cell>)] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of the first row carrying each key.
    pub(crate) fn row_index(&self) -> HashMap<&str, usize> {
        let mut index = HashMap::with_capacity(self.rows.len());
        for (idx, (key, _)) in self.rows.iter().enumerate() {
            index.entry(key.as_str()).or_insert(idx);
        }
        index
    }

    pub fn get(&self, row: &str, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.rows
            .iter()
            .find(|(key, _)| key == row)
            .map(|(_, cells)| &cells[col])
    }
}

/// Header of the per-gene table, key column first.
pub const GENE_TABLE_COLUMNS: [&str; 23] = [
    "gene",
    "n_reads",
    "n_molecules",
    "n_fragments",
    "reads_per_molecule",
    "reads_per_fragment",
    "fragments_per_molecule",
    "fragments_with_single_read_evidence",
    "molecules_with_single_read_evidence",
    "perfect_molecule_barcodes",
    "reads_mapped_exonic",
    "reads_mapped_intronic",
    "reads_mapped_utr",
    "reads_mapped_uniquely",
    "reads_mapped_multiple",
    "duplicate_reads",
    "spliced_reads",
    "molecule_barcode_fraction_bases_above_30_mean",
    "molecule_barcode_fraction_bases_above_30_variance",
    "genomic_reads_fraction_bases_quality_above_30_mean",
    "genomic_reads_fraction_bases_quality_above_30_variance",
    "genomic_read_quality_mean",
    "genomic_read_quality_variance",
];

/// Column of the single-valued summary table.
pub const SUMMARY_VALUE_COLUMN: &str = "value";

/// Summary row whose value is a gene name, never a number.
pub const MOST_ABUNDANT_GENE_ROW: &str = "most_abundant_gene";

pub(crate) fn summary_cell(name: &str, raw: &str) -> Cell {
    if name == MOST_ABUNDANT_GENE_ROW {
        Cell::Text(raw.to_string())
    } else {
        Cell::parse(raw)
    }
}

impl GeneMetricsRow {
    fn cells(&self) -> Vec<Cell> {
        vec![
            self.n_reads.into(),
            self.n_molecules.into(),
            self.n_fragments.into(),
            self.reads_per_molecule.into(),
            self.reads_per_fragment.into(),
            self.fragments_per_molecule.into(),
            self.fragments_with_single_read_evidence.into(),
            self.molecules_with_single_read_evidence.into(),
            self.perfect_molecule_barcodes.into(),
            self.reads_mapped_exonic.into(),
            self.reads_mapped_intronic.into(),
            self.reads_mapped_utr.into(),
            self.reads_mapped_uniquely.into(),
            self.reads_mapped_multiple.into(),
            self.duplicate_reads.into(),
            self.spliced_reads.into(),
            self.molecule_barcode_fraction_bases_above_30_mean.into(),
            self.molecule_barcode_fraction_bases_above_30_variance.into(),
            self.genomic_reads_fraction_bases_quality_above_30_mean.into(),
            self.genomic_reads_fraction_bases_quality_above_30_variance.into(),
            self.genomic_read_quality_mean.into(),
            self.genomic_read_quality_variance.into(),
        ]
    }
}

pub fn gene_table(rows: &[GeneMetricsRow]) -> MetricTable {
    let mut table = MetricTable::new(GENE_TABLE_COLUMNS[1..].iter().copied());
    for row in rows {
        table.push_row(row.gene.clone(), row.cells());
    }
    table
}

pub fn summary_table(summary: &ScalarSummary) -> MetricTable {
    let mut table = MetricTable::new([SUMMARY_VALUE_COLUMN]);
    for (name, value) in summary.rows() {
        table.push_row(name, vec![summary_cell(name, &value)]);
    }
    table
}

impl ResultTable {
    pub fn gene_table(&self) -> MetricTable {
        gene_table(&self.genes)
    }

    pub fn summary_table(&self) -> MetricTable {
        summary_table(&self.summary)
    }
}
