#![allow(dead_code)]

use scqc_tools::gene_metrics::{MetricsCollector, MetricsOptions, ResultTable};
use scqc_tools::record_processor::{IterSource, RecordSource};
use scqc_tools::types::{AlignmentRecord, RecordTags};
use indicatif::ProgressBar;

// The reference fixture: 300 reads over 8 genes.
//
//   gene     reads  molecules  fragments
//   ACTB       245         59        176
//   MALAT1       1          1          1
//   GAPDH        9          5          7   (RPL13, RPS18, TMSB4X alike)
//   EEF1A1       9          4          6   (FTL alike)
//
// Fragment j of a gene belongs to molecule j % molecules and sits at its own
// position. Surplus reads go round-robin to the first fragments, so ACTB ends up
// with 69 fragments seen twice and 107 seen once.
pub struct GeneSpec {
    pub gene: &'static str,
    pub reads: usize,
    pub molecules: usize,
    pub fragments: usize,
}

pub const FIXTURE_GENES: [GeneSpec; 8] = [
    GeneSpec { gene: "ACTB", reads: 245, molecules: 59, fragments: 176 },
    GeneSpec { gene: "MALAT1", reads: 1, molecules: 1, fragments: 1 },
    GeneSpec { gene: "GAPDH", reads: 9, molecules: 5, fragments: 7 },
    GeneSpec { gene: "RPL13", reads: 9, molecules: 5, fragments: 7 },
    GeneSpec { gene: "RPS18", reads: 9, molecules: 5, fragments: 7 },
    GeneSpec { gene: "TMSB4X", reads: 9, molecules: 5, fragments: 7 },
    GeneSpec { gene: "EEF1A1", reads: 9, molecules: 4, fragments: 6 },
    GeneSpec { gene: "FTL", reads: 9, molecules: 4, fragments: 6 },
];

pub const READ_LENGTH: usize = 10;

const CIGARS: [&str; 3] = ["10M", "2S8M", "5M100N5M"];
const FEATURES: [&str; 4] = ["CODING", "INTRONIC", "UTR", "INTERGENIC"];

/// A fully tagged read. `index` drives every per-read variation (qualities, CIGAR,
/// XF, NH, duplicate flag) so the fixture is deterministic.
pub fn tagged_record(index: usize, gene: &str, cell: &str, umi: &str, position: i64) -> AlignmentRecord {
    let qualities: Vec<u8> = (0..READ_LENGTH)
        .map(|k| ((index * 7 + k * 11) % 41 + 2) as u8)
        .collect();
    let umi_quality: String = (0..8)
        .map(|k| char::from(b'!' + ((index * 3 + k * 5) % 41) as u8))
        .collect();

    AlignmentRecord {
        query_name: format!("read{index:05}"),
        flag: if index % 10 == 0 { 0x400 } else { 0 },
        reference_id: 0,
        position,
        mapping_quality: 60,
        cigar: CIGARS[index % CIGARS.len()].to_string(),
        sequence: b"ACGTACGTAC".to_vec(),
        qualities: Some(qualities),
        tags: RecordTags {
            cell_barcode: Some(cell.to_string()),
            corrected_umi: Some(umi.to_string()),
            raw_umi: Some(umi.to_string()),
            umi_quality: Some(umi_quality),
            gene: Some(gene.to_string()),
            read_feature: Some(FEATURES[index % FEATURES.len()].to_string()),
            alignment_hits: Some(if index % 5 == 4 { 2 } else { 1 }),
        },
        ..Default::default()
    }
}

pub fn gene_block(spec: &GeneSpec, base_position: i64, next_index: &mut usize) -> Vec<AlignmentRecord> {
    let per_fragment = spec.reads / spec.fragments;
    let surplus = spec.reads % spec.fragments;
    let mut records = Vec::with_capacity(spec.reads);

    for j in 0..spec.fragments {
        let molecule = j % spec.molecules;
        let cell = format!("CELL{}", molecule % 4);
        let umi = format!("UMI{molecule:04}");
        let copies = per_fragment + usize::from(j < surplus);
        for _ in 0..copies {
            records.push(tagged_record(
                *next_index,
                spec.gene,
                &cell,
                &umi,
                base_position + j as i64,
            ));
            *next_index += 1;
        }
    }
    records
}

pub fn fixture_records() -> Vec<AlignmentRecord> {
    let mut next_index = 0;
    FIXTURE_GENES
        .iter()
        .enumerate()
        .flat_map(|(g, spec)| gene_block(spec, (g as i64 + 1) * 10_000, &mut next_index))
        .collect()
}

/// Deterministic Fisher-Yates shuffle.
pub fn shuffled(mut records: Vec<AlignmentRecord>, seed: u64) -> Vec<AlignmentRecord> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    for i in (1..records.len()).rev() {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let j = ((state >> 33) % (i as u64 + 1)) as usize;
        records.swap(i, j);
    }
    records
}

pub fn collect(records: &[AlignmentRecord]) -> MetricsCollector {
    let mut collector = MetricsCollector::new(MetricsOptions::default());
    IterSource::from_records(records.to_vec())
        .read_records(&mut collector, &ProgressBar::hidden())
        .expect("in-memory source never fails");
    collector
}

pub fn single_pass(records: &[AlignmentRecord]) -> ResultTable {
    collect(records).finish()
}
