#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    /// Records folded into the accumulators.
    pub processed: u64,
    /// Malformed records that were dropped.
    pub skipped: u64,
    /// Records below the mapping-quality cutoff.
    pub filtered: u64,
}

impl ProcessingStats {
    pub fn total(&self) -> u64 {
        self.processed + self.skipped + self.filtered
    }

    pub fn merge(&mut self, other: &ProcessingStats) {
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.filtered += other.filtered;
    }
}
