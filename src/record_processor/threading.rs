use super::core::processor::process_one;
use super::core::*;
use crate::types::AlignmentRecord;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{anyhow, Result};
use crossbeam_channel::{bounded, Sender};
use indicatif::ProgressBar;
use std::thread;

/// Share-nothing workers: each owns a forked processor and receives whole batches.
pub struct ThreadPool<P: RecordProcessor> {
    handles: Vec<thread::JoinHandle<(P, ProcessingStats)>>,
    tx: Sender<Vec<AlignmentRecord>>,
    num_threads: usize,
    quiet: bool,
}

impl<P: RecordProcessor> ThreadPool<P> {
    /// Spawns `num_threads` workers. The pool's own spinners stay hidden when
    /// `progress` is hidden.
    pub fn new(processor: &P, num_threads: usize, progress: &ProgressBar) -> Result<Self> {
        let num_threads = num_threads.max(1);
        let (tx, rx) = bounded::<Vec<AlignmentRecord>>(num_threads * 2);
        let mut handles = Vec::with_capacity(num_threads);

        for idx in 0..num_threads {
            let rx = rx.clone();
            let mut worker_processor = processor.fork();
            let handle = thread::Builder::new()
                .name(format!("record-worker-{idx}"))
                .spawn(move || {
                    let mut local_stats = ProcessingStats::default();
                    while let Ok(batch) = rx.recv() {
                        for record in &batch {
                            process_one(&mut worker_processor, record, &mut local_stats);
                        }
                    }
                    (worker_processor, local_stats)
                })?;
            handles.push(handle);
        }

        Ok(ThreadPool {
            handles,
            tx,
            num_threads,
            quiet: progress.is_hidden(),
        })
    }

    pub fn send(&self, batch: Vec<AlignmentRecord>) -> Result<()> {
        self.tx
            .send(batch)
            .map_err(|_| anyhow!("All record workers have stopped"))
    }

    pub fn finish(self) -> Result<(ProcessingStats, Vec<P>)> {
        drop(self.tx);

        let collect_progress = ProgressBarBuilder::new("Collecting results")
            .with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .with_tick()
            .hidden(self.quiet)
            .build()?;

        let mut stats = ProcessingStats::default();
        let mut processors = Vec::with_capacity(self.handles.len());

        for (idx, handle) in self.handles.into_iter().enumerate() {
            collect_progress.set_message(format!(
                "Collecting worker {} of {}",
                idx + 1,
                self.num_threads
            ));

            let (worker_processor, worker_stats) = handle
                .join()
                .map_err(|_| anyhow!("Record worker {} panicked", idx + 1))?;
            processors.push(worker_processor);
            stats.merge(&worker_stats);
            collect_progress.inc(1);
        }
        collect_progress.finish_and_clear();

        Ok((stats, processors))
    }
}

pub fn merge_processors<P: RecordProcessor>(
    processors: Vec<P>,
    main_processor: &mut P,
    progress: &ProgressBar,
) -> Result<()> {
    let merge_progress = ProgressBarBuilder::new("Merging results")
        .with_template("{spinner:.green} [{elapsed_precise}] {msg}")
        .with_tick()
        .hidden(progress.is_hidden())
        .build()?;

    let total = processors.len();
    for (idx, worker_processor) in processors.into_iter().enumerate() {
        merge_progress.set_message(format!("Merging processor {} of {}", idx + 1, total));
        main_processor.merge_processor(worker_processor)?;
        merge_progress.inc(1);
    }
    merge_progress.finish_and_clear();

    Ok(())
}
