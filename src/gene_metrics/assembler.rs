use super::gene_accumulator::{GeneAccumulator, GeneStatState};
use super::global_accumulator::GlobalAccumulator;
use super::table::MOST_ABUNDANT_GENE_ROW;
use serde::{Deserialize, Serialize};

/// Dataset-wide metrics, one value per name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScalarSummary {
    pub n_reads: u64,
    pub n_genes: u64,
    pub n_molecules: u64,
    pub n_fragments: u64,
    pub molecules_with_single_read_evidence: u64,
    pub fragments_with_single_read_evidence: u64,
    pub perfect_molecule_barcodes: u64,
    pub reads_mapped_exonic: u64,
    pub reads_mapped_intronic: u64,
    pub reads_mapped_utr: u64,
    pub reads_mapped_uniquely: u64,
    pub reads_mapped_multiple: u64,
    pub duplicate_reads: u64,
    pub spliced_reads: u64,
    /// Empty when no read carried a gene tag.
    pub most_abundant_gene: String,
    pub most_abundant_gene_reads: u64,
}

impl ScalarSummary {
    /// (name, value) pairs in output order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("n_reads", self.n_reads.to_string()),
            ("n_genes", self.n_genes.to_string()),
            ("n_molecules", self.n_molecules.to_string()),
            ("n_fragments", self.n_fragments.to_string()),
            (
                "molecules_with_single_read_evidence",
                self.molecules_with_single_read_evidence.to_string(),
            ),
            (
                "fragments_with_single_read_evidence",
                self.fragments_with_single_read_evidence.to_string(),
            ),
            ("perfect_molecule_barcodes", self.perfect_molecule_barcodes.to_string()),
            ("reads_mapped_exonic", self.reads_mapped_exonic.to_string()),
            ("reads_mapped_intronic", self.reads_mapped_intronic.to_string()),
            ("reads_mapped_utr", self.reads_mapped_utr.to_string()),
            ("reads_mapped_uniquely", self.reads_mapped_uniquely.to_string()),
            ("reads_mapped_multiple", self.reads_mapped_multiple.to_string()),
            ("duplicate_reads", self.duplicate_reads.to_string()),
            ("spliced_reads", self.spliced_reads.to_string()),
            (MOST_ABUNDANT_GENE_ROW, self.most_abundant_gene.clone()),
            ("most_abundant_gene_reads", self.most_abundant_gene_reads.to_string()),
        ]
    }
}

/// One row of the per-gene table. Field order is the column order on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneMetricsRow {
    pub gene: String,
    pub n_reads: u64,
    pub n_molecules: u64,
    pub n_fragments: u64,
    pub reads_per_molecule: f64,
    pub reads_per_fragment: f64,
    pub fragments_per_molecule: f64,
    pub fragments_with_single_read_evidence: u64,
    pub molecules_with_single_read_evidence: u64,
    pub perfect_molecule_barcodes: u64,
    pub reads_mapped_exonic: u64,
    pub reads_mapped_intronic: u64,
    pub reads_mapped_utr: u64,
    pub reads_mapped_uniquely: u64,
    pub reads_mapped_multiple: u64,
    pub duplicate_reads: u64,
    pub spliced_reads: u64,
    pub molecule_barcode_fraction_bases_above_30_mean: f64,
    pub molecule_barcode_fraction_bases_above_30_variance: f64,
    pub genomic_reads_fraction_bases_quality_above_30_mean: f64,
    pub genomic_reads_fraction_bases_quality_above_30_variance: f64,
    pub genomic_read_quality_mean: f64,
    pub genomic_read_quality_variance: f64,
}

impl GeneMetricsRow {
    fn from_state(gene: &str, state: &GeneStatState) -> Self {
        let reads = state.reads();
        let molecules = state.molecule_count();
        let fragments = state.fragment_count();
        let categories = state.categories();

        Self {
            gene: gene.to_string(),
            n_reads: reads,
            n_molecules: molecules,
            n_fragments: fragments,
            reads_per_molecule: ratio(reads, molecules),
            reads_per_fragment: ratio(reads, fragments),
            fragments_per_molecule: ratio(fragments, molecules),
            fragments_with_single_read_evidence: state.fragments_with_single_read_evidence(),
            molecules_with_single_read_evidence: state.molecules_with_single_read_evidence(),
            perfect_molecule_barcodes: categories.perfect_molecule_barcodes,
            reads_mapped_exonic: categories.reads_mapped_exonic,
            reads_mapped_intronic: categories.reads_mapped_intronic,
            reads_mapped_utr: categories.reads_mapped_utr,
            reads_mapped_uniquely: categories.reads_mapped_uniquely,
            reads_mapped_multiple: categories.reads_mapped_multiple,
            duplicate_reads: categories.duplicate_reads,
            spliced_reads: categories.spliced_reads,
            molecule_barcode_fraction_bases_above_30_mean: state.umi_quality_fraction().mean(),
            molecule_barcode_fraction_bases_above_30_variance: state
                .umi_quality_fraction()
                .variance(),
            genomic_reads_fraction_bases_quality_above_30_mean: state
                .genomic_quality_fraction()
                .mean(),
            genomic_reads_fraction_bases_quality_above_30_variance: state
                .genomic_quality_fraction()
                .variance(),
            genomic_read_quality_mean: state.genomic_mean_quality().mean(),
            genomic_read_quality_variance: state.genomic_mean_quality().variance(),
        }
    }
}

// Undefined when no read of the gene carried CB and UB.
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        f64::NAN
    } else {
        numerator as f64 / denominator as f64
    }
}

/// The finished result of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    pub summary: ScalarSummary,
    /// Sorted by gene name.
    pub genes: Vec<GeneMetricsRow>,
}

impl ResultTable {
    pub fn gene(&self, name: &str) -> Option<&GeneMetricsRow> {
        self.genes
            .binary_search_by(|row| row.gene.as_str().cmp(name))
            .ok()
            .map(|idx| &self.genes[idx])
    }
}

/// Reduces any number of shard accumulators into one [`ResultTable`].
///
/// Shards may be added in any order; the result only depends on the records
/// they saw.
#[derive(Debug, Default)]
pub struct MetricsAssembler {
    genes: Option<GeneAccumulator>,
    global: GlobalAccumulator,
}

impl MetricsAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_shard(&mut self, genes: GeneAccumulator, global: GlobalAccumulator) {
        match &mut self.genes {
            Some(merged) => merged.merge(genes),
            None => self.genes = Some(genes),
        }
        self.global.merge(global);
    }

    pub fn from_shards<I>(shards: I) -> ResultTable
    where
        I: IntoIterator<Item = (GeneAccumulator, GlobalAccumulator)>,
    {
        let mut assembler = Self::new();
        for (genes, global) in shards {
            assembler.add_shard(genes, global);
        }
        assembler.assemble()
    }

    pub fn assemble(self) -> ResultTable {
        let genes = self.genes.unwrap_or_default();
        let global = self.global;

        let mut rows: Vec<GeneMetricsRow> = genes
            .iter()
            .map(|(gene, state)| GeneMetricsRow::from_state(gene, state))
            .collect();
        rows.sort_by(|a, b| a.gene.cmp(&b.gene));

        let categories = global.categories();
        let (most_abundant_gene, most_abundant_gene_reads) = global
            .most_abundant_gene()
            .map(|(gene, reads)| (gene.to_string(), reads))
            .unwrap_or_default();

        let summary = ScalarSummary {
            n_reads: global.reads(),
            n_genes: rows.len() as u64,
            n_molecules: rows.iter().map(|r| r.n_molecules).sum(),
            n_fragments: rows.iter().map(|r| r.n_fragments).sum(),
            molecules_with_single_read_evidence: rows
                .iter()
                .map(|r| r.molecules_with_single_read_evidence)
                .sum(),
            fragments_with_single_read_evidence: rows
                .iter()
                .map(|r| r.fragments_with_single_read_evidence)
                .sum(),
            perfect_molecule_barcodes: categories.perfect_molecule_barcodes,
            reads_mapped_exonic: categories.reads_mapped_exonic,
            reads_mapped_intronic: categories.reads_mapped_intronic,
            reads_mapped_utr: categories.reads_mapped_utr,
            reads_mapped_uniquely: categories.reads_mapped_uniquely,
            reads_mapped_multiple: categories.reads_mapped_multiple,
            duplicate_reads: categories.duplicate_reads,
            spliced_reads: categories.spliced_reads,
            most_abundant_gene,
            most_abundant_gene_reads,
        };

        ResultTable {
            summary,
            genes: rows,
        }
    }
}
