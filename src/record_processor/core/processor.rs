use super::stats::ProcessingStats;
use crate::error::RecordError;
use crate::types::AlignmentRecord;
use anyhow::Result;

pub trait RecordProcessor: Send + Sized + 'static {
    /// Folds one record into the processor. An error means the record was malformed
    /// and has been ignored; the processor state is unchanged.
    fn process_record(&mut self, record: &AlignmentRecord) -> Result<(), RecordError>;
    fn get_min_mapping_quality(&self) -> u8 {
        0
    }
    fn supports_parallel(&self) -> bool {
        false
    }
    /// An empty processor with the same settings, used to seed worker threads.
    fn fork(&self) -> Self;
    fn merge_processor(&mut self, other: Self) -> Result<()>;
}

/// Applies the mapping-quality filter and the processor to one record, updating `stats`.
pub(crate) fn process_one<P: RecordProcessor>(
    processor: &mut P,
    record: &AlignmentRecord,
    stats: &mut ProcessingStats,
) {
    if record.mapping_quality < processor.get_min_mapping_quality() {
        stats.filtered += 1;
        return;
    }
    match processor.process_record(record) {
        Ok(()) => stats.processed += 1,
        Err(e) => {
            log::debug!("Skipping record {}: {}", record.query_name, e);
            stats.skipped += 1;
        }
    }
}
