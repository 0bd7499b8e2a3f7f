use super::classifier::ClassifiedRecord;
use super::global_accumulator::ReadCategoryCounts;
use super::keys::{FragmentKey, MoleculeKey};
use super::moments::OnlineMoments;
use super::options::QualityThresholds;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Everything known about one gene after some number of reads.
#[derive(Debug, Clone, Default)]
pub struct GeneStatState {
    reads: u64,
    categories: ReadCategoryCounts,
    /// Read support per distinct molecule.
    molecules: HashMap<MoleculeKey, u64>,
    /// Read support per distinct fragment.
    fragments: HashMap<FragmentKey, u64>,
    umi_quality_fraction: OnlineMoments,
    genomic_quality_fraction: OnlineMoments,
    genomic_mean_quality: OnlineMoments,
}

impl GeneStatState {
    fn observe(&mut self, read: &ClassifiedRecord<'_>, thresholds: &QualityThresholds) {
        self.reads += 1;
        self.categories.observe(read);

        if let Some(molecule) = &read.molecule {
            increment(&mut self.molecules, molecule);
        }
        if let Some(fragment) = &read.fragment {
            increment(&mut self.fragments, fragment);
        }

        if let Some(umi_quality) = read.umi_quality() {
            if !umi_quality.is_empty() {
                let cutoff = thresholds.umi_quality_ascii();
                let above = umi_quality.bytes().filter(|&q| q > cutoff).count();
                self.umi_quality_fraction
                    .push(above as f64 / umi_quality.len() as f64);
            }
        }

        if let Some(qualities) = read.aligned_qualities {
            if !qualities.is_empty() {
                let n = qualities.len() as f64;
                let above = qualities
                    .iter()
                    .filter(|&&q| q > thresholds.genomic_quality)
                    .count();
                let sum: u64 = qualities.iter().map(|&q| u64::from(q)).sum();
                self.genomic_quality_fraction.push(above as f64 / n);
                self.genomic_mean_quality.push(sum as f64 / n);
            }
        }
    }

    pub fn merge(&mut self, other: GeneStatState) {
        self.reads += other.reads;
        self.categories.merge(&other.categories);
        for (key, count) in other.molecules {
            *self.molecules.entry(key).or_insert(0) += count;
        }
        for (key, count) in other.fragments {
            *self.fragments.entry(key).or_insert(0) += count;
        }
        self.umi_quality_fraction.merge(&other.umi_quality_fraction);
        self.genomic_quality_fraction
            .merge(&other.genomic_quality_fraction);
        self.genomic_mean_quality.merge(&other.genomic_mean_quality);
    }

    pub fn reads(&self) -> u64 {
        self.reads
    }

    pub fn categories(&self) -> &ReadCategoryCounts {
        &self.categories
    }

    pub fn molecule_count(&self) -> u64 {
        self.molecules.len() as u64
    }

    pub fn fragment_count(&self) -> u64 {
        self.fragments.len() as u64
    }

    pub fn molecules_with_single_read_evidence(&self) -> u64 {
        self.molecules.values().filter(|&&n| n == 1).count() as u64
    }

    pub fn fragments_with_single_read_evidence(&self) -> u64 {
        self.fragments.values().filter(|&&n| n == 1).count() as u64
    }

    pub fn umi_quality_fraction(&self) -> &OnlineMoments {
        &self.umi_quality_fraction
    }

    pub fn genomic_quality_fraction(&self) -> &OnlineMoments {
        &self.genomic_quality_fraction
    }

    pub fn genomic_mean_quality(&self) -> &OnlineMoments {
        &self.genomic_mean_quality
    }
}

fn increment<K: Clone + Eq + std::hash::Hash>(counts: &mut HashMap<K, u64>, key: &K) {
    match counts.get_mut(key) {
        Some(count) => *count += 1,
        None => {
            counts.insert(key.clone(), 1);
        }
    }
}

/// Per-gene accumulators for one shard of the record stream.
#[derive(Debug, Clone, Default)]
pub struct GeneAccumulator {
    thresholds: QualityThresholds,
    genes: HashMap<String, GeneStatState>,
}

impl GeneAccumulator {
    pub fn new(thresholds: QualityThresholds) -> Self {
        Self {
            thresholds,
            genes: HashMap::new(),
        }
    }

    /// Folds one classified record into the state for `gene`.
    pub fn update(&mut self, gene: &str, read: &ClassifiedRecord<'_>) {
        let thresholds = self.thresholds;
        match self.genes.get_mut(gene) {
            Some(state) => state.observe(read, &thresholds),
            None => {
                let mut state = GeneStatState::default();
                state.observe(read, &thresholds);
                self.genes.insert(gene.to_string(), state);
            }
        }
    }

    /// Union of two shards. Genes present in both are combined.
    pub fn merge(&mut self, other: GeneAccumulator) {
        debug_assert_eq!(
            self.thresholds, other.thresholds,
            "shards were built with different quality thresholds"
        );
        for (gene, state) in other.genes {
            match self.genes.entry(gene) {
                Entry::Occupied(mut entry) => entry.get_mut().merge(state),
                Entry::Vacant(entry) => {
                    entry.insert(state);
                }
            }
        }
    }

    pub fn get(&self, gene: &str) -> Option<&GeneStatState> {
        self.genes.get(gene)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &GeneStatState)> {
        self.genes.iter()
    }
}
