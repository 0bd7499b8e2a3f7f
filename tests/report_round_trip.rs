mod common;

use common::{fixture_records, single_pass};
use scqc_tools::api::{compare_table_files, TableKind};
use scqc_tools::gene_metrics::report::{
    open_table, read_gene_rows, read_keyed_table, read_summary_table, write_result_table,
    ReportPaths,
};
use scqc_tools::gene_metrics::{Cell, NanPolicy, ToleranceComparator};
use std::fs;
use std::io::Write;
use tempfile::tempdir;

#[test]
fn written_tables_read_back_equal() {
    let dir = tempdir().expect("tempdir");
    let prefix = dir.path().join("fixture");
    let paths = ReportPaths::from_prefix(&prefix.display().to_string());

    let table = single_pass(&fixture_records());
    write_result_table(&table, &paths).expect("write tables");

    let summary_text = fs::read_to_string(&paths.summary).expect("summary file");
    assert_eq!(summary_text.lines().next(), Some("n_reads,300"));
    assert!(summary_text.contains("most_abundant_gene,ACTB\n"));

    let genes_text = fs::read_to_string(&paths.genes).expect("genes file");
    assert!(genes_text.starts_with("gene,n_reads,n_molecules,n_fragments,"));
    assert!(genes_text.contains("\nMALAT1,1,1,1,1.0,1.0,1.0,"));

    let comparator = ToleranceComparator::default();
    let genes = read_keyed_table(open_table(&paths.genes).expect("open")).expect("parse genes");
    let result = comparator.compare(&table.gene_table(), &genes);
    assert!(result.passed(), "{:?}", result.mismatches);
    assert_eq!(result.cells_compared, 8 * 22);

    let summary = read_summary_table(open_table(&paths.summary).expect("open")).expect("parse summary");
    assert!(comparator.compare(&table.summary_table(), &summary).passed());
    assert_eq!(
        summary.get("most_abundant_gene", "value"),
        Some(&Cell::Text("ACTB".into()))
    );

    let rows = read_gene_rows(open_table(&paths.genes).expect("open")).expect("typed rows");
    assert_eq!(rows.len(), 8);
    let malat1 = rows.iter().find(|row| row.gene == "MALAT1").expect("MALAT1 row");
    assert!(malat1.genomic_read_quality_variance.is_nan());
}

#[test]
fn compressed_golden_table_is_accepted() {
    let dir = tempdir().expect("tempdir");
    let paths = ReportPaths::from_prefix(&dir.path().join("run").display().to_string());
    let table = single_pass(&fixture_records());
    write_result_table(&table, &paths).expect("write tables");

    let golden = dir.path().join("golden.genes.csv.gz");
    {
        let mut writer = niffler::to_path(&golden, niffler::compression::Format::Gzip, niffler::Level::Six)
            .expect("gzip writer");
        writer
            .write_all(&fs::read(&paths.genes).expect("read genes"))
            .expect("write gzip");
    }

    let comparison = compare_table_files(
        &golden,
        &paths.genes,
        TableKind::Keyed,
        &ToleranceComparator::default(),
    )
    .expect("compare");
    assert!(comparison.passed(), "{:?}", comparison.mismatches);
}

#[test]
fn blank_cells_are_mismatches_not_nan() {
    let dir = tempdir().expect("tempdir");
    let expected = dir.path().join("expected.csv");
    let actual = dir.path().join("actual.csv");
    fs::write(&expected, "gene,mean,variance\nMALAT1,31.5,NaN\n").expect("write");
    fs::write(&actual, "gene,mean,variance\nMALAT1,31.5,\n").expect("write");

    for policy in [NanPolicy::Strict, NanPolicy::FillZero] {
        let comparison = compare_table_files(
            &expected,
            &actual,
            TableKind::Keyed,
            &ToleranceComparator::default().with_nan_policy(policy),
        )
        .expect("compare");
        assert_eq!(comparison.mismatches.len(), 1, "{policy:?}");
        assert_eq!(comparison.mismatches[0].column, "variance");
    }
}

#[test]
fn unreadable_table_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("missing.csv");
    let result = compare_table_files(&missing, &missing, TableKind::Summary, &ToleranceComparator::default());
    assert!(result.is_err());
}
