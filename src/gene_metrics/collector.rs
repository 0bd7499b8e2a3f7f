use super::assembler::{MetricsAssembler, ResultTable};
use super::classifier::EquivalenceClassifier;
use super::gene_accumulator::GeneAccumulator;
use super::global_accumulator::GlobalAccumulator;
use super::options::MetricsOptions;
use crate::error::RecordError;
use crate::record_processor::core::RecordProcessor;
use crate::types::AlignmentRecord;
use anyhow::Result;

/// Classifies records and feeds them to one shard's accumulators.
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    classifier: EquivalenceClassifier,
    options: MetricsOptions,
    genes: GeneAccumulator,
    global: GlobalAccumulator,
}

impl MetricsCollector {
    pub fn new(options: MetricsOptions) -> Self {
        Self {
            classifier: EquivalenceClassifier::new(),
            genes: GeneAccumulator::new(options.thresholds),
            global: GlobalAccumulator::new(),
            options,
        }
    }

    pub fn genes(&self) -> &GeneAccumulator {
        &self.genes
    }

    pub fn global(&self) -> &GlobalAccumulator {
        &self.global
    }

    pub fn into_parts(self) -> (GeneAccumulator, GlobalAccumulator) {
        (self.genes, self.global)
    }

    pub fn finish(self) -> ResultTable {
        let mut assembler = MetricsAssembler::new();
        assembler.add_shard(self.genes, self.global);
        assembler.assemble()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(MetricsOptions::default())
    }
}

impl RecordProcessor for MetricsCollector {
    fn process_record(&mut self, record: &AlignmentRecord) -> Result<(), RecordError> {
        let read = self.classifier.classify(record)?;
        self.global.update(&read);
        if let Some(gene) = read.gene {
            self.genes.update(gene, &read);
        }
        Ok(())
    }

    fn get_min_mapping_quality(&self) -> u8 {
        self.options.min_mapping_quality
    }

    fn supports_parallel(&self) -> bool {
        true
    }

    fn fork(&self) -> Self {
        Self::new(self.options.clone())
    }

    fn merge_processor(&mut self, other: Self) -> Result<()> {
        self.genes.merge(other.genes);
        self.global.merge(other.global);
        Ok(())
    }
}
