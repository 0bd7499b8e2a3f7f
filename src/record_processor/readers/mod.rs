mod bam;
mod iter;

pub use bam::BamRecordReader;
pub use iter::IterSource;
