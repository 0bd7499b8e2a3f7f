use crate::record_processor::core::RecordSource;
use crate::types::*;
use anyhow::{Context, Result};
use rust_htslib::bam::{self, record::Aux, Read};
use std::path::Path;

/// Decodes SAM, BAM or CRAM through htslib.
pub struct BamRecordReader {
    reader: bam::Reader,
    record: bam::Record,
}

impl BamRecordReader {
    pub fn new(path: &Path, reference: Option<&Path>) -> Result<Self> {
        let mut reader = bam::Reader::from_path(path)
            .with_context(|| format!("Failed to open alignment file {}", path.display()))?;

        if path.extension().map_or(false, |ext| ext == "cram") {
            if let Some(ref_path) = reference {
                reader
                    .set_reference(ref_path)
                    .with_context(|| format!("Failed to set CRAM reference {}", ref_path.display()))?;
            }
        }

        Ok(Self {
            reader,
            record: bam::Record::new(),
        })
    }

    pub fn set_threads(&mut self, threads: usize) -> Result<()> {
        if threads > 1 {
            self.reader.set_threads(threads)?;
        }
        Ok(())
    }
}

impl RecordSource for BamRecordReader {
    fn next_record(&mut self) -> Option<Result<AlignmentRecord>> {
        match self.reader.read(&mut self.record)? {
            Ok(()) => Some(Ok(convert_record(&self.record))),
            Err(e) => Some(Err(e).context("Failed to decode alignment record")),
        }
    }
}

pub(crate) fn convert_record(record: &bam::Record) -> AlignmentRecord {
    let qual = record.qual();
    // htslib fills missing qualities with 0xFF
    let qualities = if qual.is_empty() || qual[0] == 0xFF {
        None
    } else {
        Some(qual.to_vec())
    };

    AlignmentRecord {
        query_name: String::from_utf8_lossy(record.qname()).into_owned(),
        flag: record.flags(),
        reference_id: record.tid(),
        position: record.pos(),
        mapping_quality: record.mapq(),
        cigar: record.cigar().to_string(),
        mate_reference_id: record.mtid(),
        mate_position: record.mpos(),
        template_length: record.insert_size(),
        sequence: record.seq().as_bytes(),
        qualities,
        tags: RecordTags {
            cell_barcode: string_tag(record, CELL_BARCODE_TAG),
            corrected_umi: string_tag(record, CORRECTED_UMI_TAG),
            raw_umi: string_tag(record, RAW_UMI_TAG),
            umi_quality: string_tag(record, UMI_QUALITY_TAG),
            gene: string_tag(record, GENE_TAG),
            read_feature: string_tag(record, READ_FEATURE_TAG),
            alignment_hits: integer_tag(record, ALIGNMENT_HITS_TAG),
        },
    }
}

fn string_tag(record: &bam::Record, tag: &[u8]) -> Option<String> {
    match record.aux(tag) {
        Ok(Aux::String(value)) => Some(value.to_string()),
        Ok(Aux::Char(value)) => Some(char::from(value).to_string()),
        _ => None,
    }
}

fn integer_tag(record: &bam::Record, tag: &[u8]) -> Option<i64> {
    match record.aux(tag).ok()? {
        Aux::I8(v) => Some(v.into()),
        Aux::U8(v) => Some(v.into()),
        Aux::I16(v) => Some(v.into()),
        Aux::U16(v) => Some(v.into()),
        Aux::I32(v) => Some(v.into()),
        Aux::U32(v) => Some(v.into()),
        _ => None,
    }
}
