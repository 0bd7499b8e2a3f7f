pub(crate) mod processor;
pub(crate) mod source;
pub(crate) mod stats;

pub use processor::RecordProcessor;
pub use source::RecordSource;
pub use stats::ProcessingStats;
