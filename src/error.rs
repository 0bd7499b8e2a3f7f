use thiserror::Error;

/// Problems with a single record. These never abort a run: the record is skipped
/// and counted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("invalid CIGAR string '{0}'")]
    InvalidCigar(String),

    #[error("base quality {value} at offset {offset} is not a valid Phred score")]
    InvalidQuality { offset: usize, value: u8 },

    #[error("CIGAR implies {expected} query bases but {found} qualities are present")]
    QualityLengthMismatch { expected: usize, found: usize },

    #[error("UMI quality string contains a non-printable character at offset {0}")]
    InvalidUmiQuality(usize),
}
