use crate::api::{ApiError, ApiResult};
use crate::gene_metrics::report::{open_table, read_keyed_table, read_summary_table};
use crate::gene_metrics::tolerance::{Comparison, ToleranceComparator};
use crate::gene_metrics::MetricTable;
use std::path::Path;

/// Layout of a table on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Header row, first column is the row key.
    Keyed,
    /// Header-less `name,value` pairs.
    Summary,
}

pub fn load_table(path: &Path, kind: TableKind) -> ApiResult<MetricTable> {
    let reader = open_table(path).map_err(|e| ApiError::Table(format!("{:#}", e)))?;
    let table = match kind {
        TableKind::Keyed => read_keyed_table(reader),
        TableKind::Summary => read_summary_table(reader),
    };
    table.map_err(|e| ApiError::Table(format!("{}: {:#}", path.display(), e)))
}

/// Loads two tables of the same layout and compares them cell by cell.
pub fn compare_table_files(
    expected: &Path,
    actual: &Path,
    kind: TableKind,
    comparator: &ToleranceComparator,
) -> ApiResult<Comparison> {
    let expected = load_table(expected, kind)?;
    let actual = load_table(actual, kind)?;
    Ok(comparator.compare(&expected, &actual))
}
