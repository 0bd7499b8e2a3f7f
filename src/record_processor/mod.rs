pub mod core;
pub mod readers;
pub mod threading;

// Re-export commonly used items
pub use self::core::{ProcessingStats, RecordProcessor, RecordSource};
pub use readers::{BamRecordReader, IterSource};
