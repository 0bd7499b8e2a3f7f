use crate::gene_metrics::NanPolicy;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Read settings from this TOML file instead of the user config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute per-gene and dataset-wide QC metrics from a tagged BAM/SAM/CRAM file
    GeneMetrics(GeneMetricsArgs),

    /// Compare two metric tables within numeric tolerance
    Compare(CompareArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct GeneMetricsArgs {
    /// Input alignment file carrying CB/UB/UR/UY/GE/XF/NH tags
    pub bam_file: PathBuf,

    /// Output prefix; writes <PREFIX>.summary.csv and <PREFIX>.genes.csv
    #[arg(short = 'o', long = "output-prefix", default_value = "gene_metrics")]
    pub output_prefix: String,

    /// Reference FASTA, required for CRAM input
    #[arg(short = 'r', long)]
    pub reference: Option<PathBuf>,

    /// Worker threads (default from config: 1)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Records per worker batch (default from config: 10000)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// UMI base quality threshold, Phred (default from config: 30)
    #[arg(long)]
    pub umi_quality_threshold: Option<u8>,

    /// Genomic base quality threshold, Phred (default from config: 30)
    #[arg(long)]
    pub genomic_quality_threshold: Option<u8>,

    /// Ignore records below this mapping quality (default from config: 0)
    #[arg(long)]
    pub min_mapping_quality: Option<u8>,

    /// Also write a JSON export to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Sample identifier recorded in the JSON export
    #[arg(long)]
    pub sample_id: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CompareArgs {
    /// Golden table
    pub expected: PathBuf,

    /// Table to validate
    pub actual: PathBuf,

    /// Both inputs are header-less name,value summaries
    #[arg(long)]
    pub summary: bool,

    /// Absolute tolerance (default from config: 1e-8)
    #[arg(long)]
    pub abs_tol: Option<f64>,

    /// Relative tolerance (default from config: 1e-5)
    #[arg(long)]
    pub rel_tol: Option<f64>,

    /// How NaN cells are compared (default from config: strict)
    #[arg(long, value_enum)]
    pub nan_policy: Option<NanPolicy>,

    /// Maximum number of mismatches to print
    #[arg(long, default_value = "20")]
    pub max_diffs: usize,
}
