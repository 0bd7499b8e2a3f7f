/// SAM flag bit marking PCR or optical duplicates.
pub const DUPLICATE_FLAG: u16 = 0x400;

/// SAM flag bit marking an unmapped read.
pub const UNMAPPED_FLAG: u16 = 0x4;

pub const CELL_BARCODE_TAG: &[u8] = b"CB";
pub const CORRECTED_UMI_TAG: &[u8] = b"UB";
pub const RAW_UMI_TAG: &[u8] = b"UR";
pub const UMI_QUALITY_TAG: &[u8] = b"UY";
pub const GENE_TAG: &[u8] = b"GE";
pub const READ_FEATURE_TAG: &[u8] = b"XF";
pub const ALIGNMENT_HITS_TAG: &[u8] = b"NH";

/// Read feature classification carried in the XF tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadFeature {
    Coding,
    Intronic,
    Utr,
    Other,
}

impl ReadFeature {
    /// Exact, case-sensitive match on the tag value.
    pub fn from_tag(value: &str) -> Self {
        match value {
            "CODING" => ReadFeature::Coding,
            "INTRONIC" => ReadFeature::Intronic,
            "UTR" => ReadFeature::Utr,
            _ => ReadFeature::Other,
        }
    }
}

/// The annotation tags this crate understands. Anything else on the record is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTags {
    /// CB
    pub cell_barcode: Option<String>,
    /// UB
    pub corrected_umi: Option<String>,
    /// UR
    pub raw_umi: Option<String>,
    /// UY, Phred+33 encoded
    pub umi_quality: Option<String>,
    /// GE
    pub gene: Option<String>,
    /// XF
    pub read_feature: Option<String>,
    /// NH
    pub alignment_hits: Option<i64>,
}

impl RecordTags {
    pub fn read_feature(&self) -> Option<ReadFeature> {
        self.read_feature.as_deref().map(ReadFeature::from_tag)
    }

    /// True when the raw and corrected UMIs are both present and identical.
    pub fn has_perfect_umi(&self) -> bool {
        match (&self.raw_umi, &self.corrected_umi) {
            (Some(raw), Some(corrected)) => raw.as_bytes() == corrected.as_bytes(),
            _ => false,
        }
    }
}

/// One decoded alignment, as handed over by a record decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord {
    pub query_name: String,
    pub flag: u16,
    pub reference_id: i32,
    /// 0-based leftmost position
    pub position: i64,
    pub mapping_quality: u8,
    /// CIGAR in SAM text form; `*` or empty when unavailable
    pub cigar: String,
    pub mate_reference_id: i32,
    pub mate_position: i64,
    pub template_length: i64,
    pub sequence: Vec<u8>,
    /// Raw Phred scores for every base of the read, soft clips included
    pub qualities: Option<Vec<u8>>,
    pub tags: RecordTags,
}

impl Default for AlignmentRecord {
    fn default() -> Self {
        Self {
            query_name: String::new(),
            flag: 0,
            reference_id: -1,
            position: -1,
            mapping_quality: 255,
            cigar: String::from("*"),
            mate_reference_id: -1,
            mate_position: -1,
            template_length: 0,
            sequence: Vec::new(),
            qualities: None,
            tags: RecordTags::default(),
        }
    }
}

impl AlignmentRecord {
    pub fn is_duplicate(&self) -> bool {
        self.flag & DUPLICATE_FLAG != 0
    }

    pub fn is_unmapped(&self) -> bool {
        self.flag & UNMAPPED_FLAG != 0
    }
}
