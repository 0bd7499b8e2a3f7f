use crate::record_processor::core::RecordSource;
use crate::types::AlignmentRecord;
use anyhow::Result;

/// Adapts any iterator of records, e.g. records decoded elsewhere or built in memory.
pub struct IterSource<I> {
    inner: I,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = Result<AlignmentRecord>>,
{
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

type RecordFn = fn(AlignmentRecord) -> Result<AlignmentRecord>;

impl IterSource<std::iter::Map<std::vec::IntoIter<AlignmentRecord>, RecordFn>> {
    pub fn from_records(records: Vec<AlignmentRecord>) -> Self {
        Self::new(records.into_iter().map(infallible as RecordFn))
    }
}

fn infallible(record: AlignmentRecord) -> Result<AlignmentRecord> {
    Ok(record)
}

impl<I> RecordSource for IterSource<I>
where
    I: Iterator<Item = Result<AlignmentRecord>>,
{
    fn next_record(&mut self) -> Option<Result<AlignmentRecord>> {
        self.inner.next()
    }
}
