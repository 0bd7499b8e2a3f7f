//! Per-gene and dataset-wide QC metrics over a stream of annotated alignments.
//!
//! Records are classified into molecule and fragment equivalence classes, folded into
//! mergeable accumulators, and finally assembled into a [`ResultTable`].

pub mod assembler;
pub mod cigar;
pub mod classifier;
pub mod collector;
pub mod gene_accumulator;
pub mod global_accumulator;
pub mod keys;
pub mod moments;
pub mod options;
pub mod report;
pub mod table;
pub mod tolerance;

pub use assembler::{GeneMetricsRow, MetricsAssembler, ResultTable, ScalarSummary};
pub use classifier::{ClassifiedRecord, EquivalenceClassifier};
pub use collector::MetricsCollector;
pub use gene_accumulator::{GeneAccumulator, GeneStatState};
pub use global_accumulator::{GlobalAccumulator, ReadCategoryCounts};
pub use keys::{FragmentKey, MoleculeKey};
pub use moments::OnlineMoments;
pub use options::{MetricsOptions, QualityThresholds};
pub use table::{Cell, MetricTable};
pub use tolerance::{Comparison, Mismatch, NanPolicy, ToleranceComparator};
