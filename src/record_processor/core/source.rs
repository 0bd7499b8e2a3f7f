use super::processor::{process_one, RecordProcessor};
use super::stats::ProcessingStats;
use crate::record_processor::threading::{merge_processors, ThreadPool};
use crate::types::AlignmentRecord;
use anyhow::Result;
use indicatif::ProgressBar;
use log::{info, warn};

const PROGRESS_INTERVAL: u64 = 10_000;

/// A pull-based stream of records. Decoding failures are structural and end the run.
pub trait RecordSource {
    fn next_record(&mut self) -> Option<Result<AlignmentRecord>>;

    fn read_records<P: RecordProcessor>(
        &mut self,
        processor: &mut P,
        progress: &ProgressBar,
    ) -> Result<ProcessingStats> {
        let mut stats = ProcessingStats::default();

        while let Some(record) = self.next_record() {
            let record = record?;
            process_one(processor, &record, &mut stats);

            if stats.total() % PROGRESS_INTERVAL == 0 {
                progress.set_position(stats.total());
            }
        }

        progress.set_position(stats.total());
        log_summary(&stats);
        Ok(stats)
    }

    /// Reads on the calling thread and hands batches of `batch_size` records to
    /// `num_threads` workers. Falls back to [`RecordSource::read_records`] when the
    /// processor cannot be split.
    fn read_records_with_threads<P: RecordProcessor>(
        &mut self,
        processor: &mut P,
        progress: &ProgressBar,
        num_threads: usize,
        batch_size: usize,
    ) -> Result<ProcessingStats> {
        if num_threads <= 1 || !processor.supports_parallel() {
            return self.read_records(processor, progress);
        }

        let batch_size = batch_size.max(1);
        let pool = ThreadPool::new(processor, num_threads, progress)?;
        let mut batch = Vec::with_capacity(batch_size);
        let mut read: u64 = 0;

        while let Some(record) = self.next_record() {
            batch.push(record?);
            read += 1;
            if batch.len() >= batch_size {
                pool.send(std::mem::replace(&mut batch, Vec::with_capacity(batch_size)))?;
                progress.set_position(read);
            }
        }
        if !batch.is_empty() {
            pool.send(batch)?;
        }
        progress.set_position(read);

        let (stats, workers) = pool.finish()?;
        merge_processors(workers, processor, progress)?;
        log_summary(&stats);
        Ok(stats)
    }
}

fn log_summary(stats: &ProcessingStats) {
    info!(
        "Processed {} records ({} below mapping quality cutoff)",
        stats.processed, stats.filtered
    );
    if stats.skipped > 0 {
        warn!("Skipped {} malformed records", stats.skipped);
    }
}
