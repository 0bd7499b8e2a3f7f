use super::cigar::Cigar;
use super::keys::{FragmentKey, MoleculeKey};
use crate::error::RecordError;
use crate::types::AlignmentRecord;

/// Highest Phred score representable in SAM text (`~` - 33).
pub const MAX_PHRED: u8 = 93;

/// A record together with everything derived from it during classification.
#[derive(Debug, Clone)]
pub struct ClassifiedRecord<'a> {
    pub record: &'a AlignmentRecord,
    /// `None` excludes the record from all per-gene accounting.
    pub gene: Option<&'a str>,
    /// Present only when GE, CB and UB are all present.
    pub molecule: Option<MoleculeKey>,
    pub fragment: Option<FragmentKey>,
    pub spliced: bool,
    /// Base qualities with soft clips removed.
    pub aligned_qualities: Option<&'a [u8]>,
}

impl ClassifiedRecord<'_> {
    pub fn umi_quality(&self) -> Option<&str> {
        self.record.tags.umi_quality.as_deref()
    }
}

/// Assigns records to molecule and fragment equivalence classes.
///
/// This is the only place where missing tags are handled:
/// - no GE: the record only feeds dataset-wide counters;
/// - GE but no CB or UB: the record feeds the gene's read count and quality
///   statistics but not its molecule/fragment sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct EquivalenceClassifier;

impl EquivalenceClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify<'a>(
        &self,
        record: &'a AlignmentRecord,
    ) -> Result<ClassifiedRecord<'a>, RecordError> {
        let cigar = Cigar::parse(&record.cigar)?;
        let aligned_qualities = aligned_qualities(record, &cigar)?;
        validate_umi_quality(record)?;

        let tags = &record.tags;
        let gene = tags.gene.as_deref();
        let molecule = match (gene, &tags.cell_barcode, &tags.corrected_umi) {
            (Some(gene), Some(cell), Some(umi)) => {
                Some(MoleculeKey::new(cell.as_str(), umi.as_str(), gene))
            }
            _ => None,
        };
        let fragment = molecule
            .as_ref()
            .map(|key| FragmentKey::new(key.clone(), record.position));

        Ok(ClassifiedRecord {
            record,
            gene,
            molecule,
            fragment,
            spliced: cigar.is_spliced(),
            aligned_qualities,
        })
    }
}

fn aligned_qualities<'a>(
    record: &'a AlignmentRecord,
    cigar: &Cigar,
) -> Result<Option<&'a [u8]>, RecordError> {
    let Some(qualities) = record.qualities.as_deref() else {
        return Ok(None);
    };

    if let Some(offset) = qualities.iter().position(|&q| q > MAX_PHRED) {
        return Err(RecordError::InvalidQuality {
            offset,
            value: qualities[offset],
        });
    }

    if cigar.is_empty() {
        return Ok(Some(qualities));
    }

    let expected = cigar.query_length();
    if expected != qualities.len() {
        return Err(RecordError::QualityLengthMismatch {
            expected,
            found: qualities.len(),
        });
    }

    let start = cigar.leading_soft_clip();
    let end = qualities.len() - cigar.trailing_soft_clip();
    // A fully soft-clipped read has no aligned bases.
    Ok(Some(if start < end { &qualities[start..end] } else { &[] }))
}

fn validate_umi_quality(record: &AlignmentRecord) -> Result<(), RecordError> {
    if let Some(umi_quality) = &record.tags.umi_quality {
        if let Some(offset) = umi_quality.bytes().position(|b| !(b'!'..=b'~').contains(&b)) {
            return Err(RecordError::InvalidUmiQuality(offset));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordTags;

    fn tagged_record() -> AlignmentRecord {
        AlignmentRecord {
            query_name: "read1".into(),
            reference_id: 0,
            position: 1_000,
            cigar: "2S8M".into(),
            sequence: b"ACGTACGTAC".to_vec(),
            qualities: Some(vec![2, 2, 30, 31, 32, 33, 34, 35, 36, 37]),
            tags: RecordTags {
                cell_barcode: Some("AAACCTG".into()),
                corrected_umi: Some("GGTTAACC".into()),
                raw_umi: Some("GGTTAACC".into()),
                umi_quality: Some("IIIIII##".into()),
                gene: Some("ACTB".into()),
                read_feature: Some("CODING".into()),
                alignment_hits: Some(1),
            },
            ..Default::default()
        }
    }

    #[test]
    fn fully_tagged_record_gets_both_keys() {
        let record = tagged_record();
        let classified = EquivalenceClassifier::new().classify(&record).unwrap();

        let molecule = MoleculeKey::new("AAACCTG", "GGTTAACC", "ACTB");
        assert_eq!(classified.gene, Some("ACTB"));
        assert_eq!(classified.molecule.as_ref(), Some(&molecule));
        assert_eq!(classified.fragment, Some(FragmentKey::new(molecule, 1_000)));
        assert_eq!(
            classified.aligned_qualities,
            Some(&[30u8, 31, 32, 33, 34, 35, 36, 37][..])
        );
        assert!(!classified.spliced);
    }

    #[test]
    fn missing_gene_excludes_everything_per_gene() {
        let mut record = tagged_record();
        record.tags.gene = None;
        let classified = EquivalenceClassifier::new().classify(&record).unwrap();

        assert!(classified.gene.is_none());
        assert!(classified.molecule.is_none());
        assert!(classified.fragment.is_none());
    }

    #[test]
    fn missing_cell_or_umi_keeps_gene_but_drops_keys() {
        let classifier = EquivalenceClassifier::new();

        let mut no_cell = tagged_record();
        no_cell.tags.cell_barcode = None;
        let classified = classifier.classify(&no_cell).unwrap();
        assert_eq!(classified.gene, Some("ACTB"));
        assert!(classified.molecule.is_none());
        assert!(classified.fragment.is_none());

        let mut no_umi = tagged_record();
        no_umi.tags.corrected_umi = None;
        let classified = classifier.classify(&no_umi).unwrap();
        assert_eq!(classified.gene, Some("ACTB"));
        assert!(classified.molecule.is_none());
    }

    #[test]
    fn spliced_reads_are_flagged() {
        let mut record = tagged_record();
        record.cigar = "2S4M500N4M".into();
        assert!(EquivalenceClassifier::new().classify(&record).unwrap().spliced);
    }

    #[test]
    fn malformed_records_are_rejected() {
        let classifier = EquivalenceClassifier::new();

        let mut bad_cigar = tagged_record();
        bad_cigar.cigar = "8Z2S".into();
        assert!(matches!(
            classifier.classify(&bad_cigar),
            Err(RecordError::InvalidCigar(_))
        ));

        let mut bad_quality = tagged_record();
        bad_quality.qualities = Some(vec![30, 30, 30, 255, 30, 30, 30, 30, 30, 30]);
        assert_eq!(
            classifier.classify(&bad_quality).unwrap_err(),
            RecordError::InvalidQuality { offset: 3, value: 255 }
        );

        let mut short_quality = tagged_record();
        short_quality.qualities = Some(vec![30; 4]);
        assert_eq!(
            classifier.classify(&short_quality).unwrap_err(),
            RecordError::QualityLengthMismatch { expected: 10, found: 4 }
        );

        let mut bad_umi_quality = tagged_record();
        bad_umi_quality.tags.umi_quality = Some("II I".into());
        assert_eq!(
            classifier.classify(&bad_umi_quality).unwrap_err(),
            RecordError::InvalidUmiQuality(2)
        );
    }

    #[test]
    fn unavailable_cigar_keeps_all_qualities() {
        let mut record = tagged_record();
        record.cigar = "*".into();
        let classified = EquivalenceClassifier::new().classify(&record).unwrap();
        assert_eq!(classified.aligned_qualities.map(<[u8]>::len), Some(10));
    }
}
