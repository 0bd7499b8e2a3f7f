use super::classifier::ClassifiedRecord;
use crate::types::ReadFeature;
use std::collections::HashMap;

/// Read-level category counters. Kept once for the whole dataset and once per gene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadCategoryCounts {
    pub perfect_molecule_barcodes: u64,
    pub reads_mapped_exonic: u64,
    pub reads_mapped_intronic: u64,
    pub reads_mapped_utr: u64,
    pub reads_mapped_uniquely: u64,
    pub reads_mapped_multiple: u64,
    pub duplicate_reads: u64,
    pub spliced_reads: u64,
}

impl ReadCategoryCounts {
    pub fn observe(&mut self, read: &ClassifiedRecord<'_>) {
        let record = read.record;
        let tags = &record.tags;

        if record.is_duplicate() {
            self.duplicate_reads += 1;
        }
        if read.spliced {
            self.spliced_reads += 1;
        }
        match tags.read_feature() {
            Some(ReadFeature::Coding) => self.reads_mapped_exonic += 1,
            Some(ReadFeature::Intronic) => self.reads_mapped_intronic += 1,
            Some(ReadFeature::Utr) => self.reads_mapped_utr += 1,
            Some(ReadFeature::Other) | None => {}
        }
        match tags.alignment_hits {
            Some(1) => self.reads_mapped_uniquely += 1,
            Some(hits) if hits > 1 => self.reads_mapped_multiple += 1,
            _ => {}
        }
        if tags.has_perfect_umi() {
            self.perfect_molecule_barcodes += 1;
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.perfect_molecule_barcodes += other.perfect_molecule_barcodes;
        self.reads_mapped_exonic += other.reads_mapped_exonic;
        self.reads_mapped_intronic += other.reads_mapped_intronic;
        self.reads_mapped_utr += other.reads_mapped_utr;
        self.reads_mapped_uniquely += other.reads_mapped_uniquely;
        self.reads_mapped_multiple += other.reads_mapped_multiple;
        self.duplicate_reads += other.duplicate_reads;
        self.spliced_reads += other.spliced_reads;
    }
}

/// Dataset-wide counters. Every classified record lands here, with or without a gene.
#[derive(Debug, Clone, Default)]
pub struct GlobalAccumulator {
    reads: u64,
    categories: ReadCategoryCounts,
    gene_reads: HashMap<String, u64>,
}

impl GlobalAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, read: &ClassifiedRecord<'_>) {
        self.reads += 1;
        self.categories.observe(read);

        if let Some(gene) = read.gene {
            match self.gene_reads.get_mut(gene) {
                Some(count) => *count += 1,
                None => {
                    self.gene_reads.insert(gene.to_string(), 1);
                }
            }
        }
    }

    pub fn merge(&mut self, other: GlobalAccumulator) {
        self.reads += other.reads;
        self.categories.merge(&other.categories);
        for (gene, count) in other.gene_reads {
            *self.gene_reads.entry(gene).or_insert(0) += count;
        }
    }

    pub fn reads(&self) -> u64 {
        self.reads
    }

    pub fn categories(&self) -> &ReadCategoryCounts {
        &self.categories
    }

    /// The gene with the most reads; ties go to the smallest gene name.
    pub fn most_abundant_gene(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (gene, &count) in &self.gene_reads {
            let better = match best {
                None => true,
                Some((best_gene, best_count)) => {
                    count > best_count || (count == best_count && gene.as_str() < best_gene)
                }
            };
            if better {
                best = Some((gene.as_str(), count));
            }
        }
        best
    }
}
