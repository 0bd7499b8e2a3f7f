use super::table::{Cell, MetricTable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// How undefined values are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NanPolicy {
    /// NaN only matches NaN.
    #[default]
    #[value(name = "strict")]
    Strict,
    /// NaN is replaced by zero on both sides before comparing.
    #[value(name = "fill-zero")]
    FillZero,
}

/// A cell that differs between the expected and actual tables. `None` marks a row
/// or column that only exists on the other side.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub row: String,
    pub column: String,
    pub expected: Option<Cell>,
    pub actual: Option<Cell>,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |cell: &Option<Cell>| match cell {
            Some(cell) => cell.to_string(),
            None => "<missing>".to_string(),
        };
        write!(
            f,
            "{} / {}: expected {}, actual {}",
            self.row,
            self.column,
            show(&self.expected),
            show(&self.actual)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    pub cells_compared: usize,
    pub mismatches: Vec<Mismatch>,
}

impl Comparison {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Cell-by-cell comparison of two keyed tables with absolute + relative tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceComparator {
    pub abs_tol: f64,
    pub rel_tol: f64,
    pub nan_policy: NanPolicy,
}

impl Default for ToleranceComparator {
    fn default() -> Self {
        Self {
            abs_tol: 1e-8,
            rel_tol: 1e-5,
            nan_policy: NanPolicy::Strict,
        }
    }
}

impl ToleranceComparator {
    pub fn new(abs_tol: f64, rel_tol: f64) -> Self {
        Self {
            abs_tol,
            rel_tol,
            ..Default::default()
        }
    }

    pub fn with_nan_policy(mut self, nan_policy: NanPolicy) -> Self {
        self.nan_policy = nan_policy;
        self
    }

    /// `|expected - actual| <= abs_tol + rel_tol * |actual|`, with NaN handled per policy.
    pub fn values_match(&self, expected: f64, actual: f64) -> bool {
        let (expected, actual) = match self.nan_policy {
            NanPolicy::Strict => (expected, actual),
            NanPolicy::FillZero => (fill_nan(expected), fill_nan(actual)),
        };

        if expected.is_nan() || actual.is_nan() {
            return expected.is_nan() && actual.is_nan();
        }
        if expected.is_infinite() || actual.is_infinite() {
            return expected == actual;
        }
        (expected - actual).abs() <= self.abs_tol + self.rel_tol * actual.abs()
    }

    pub fn cells_match(&self, expected: &Cell, actual: &Cell) -> bool {
        match (expected, actual) {
            (Cell::Number(e), Cell::Number(a)) => self.values_match(*e, *a),
            (Cell::Text(e), Cell::Text(a)) => e == a,
            _ => false,
        }
    }

    /// Rows are matched by key and columns by name; order does not matter. Only the
    /// first row with a given key is compared, every repeat is a mismatch.
    pub fn compare(&self, expected: &MetricTable, actual: &MetricTable) -> Comparison {
        let mut comparison = Comparison::default();
        let actual_rows = actual.row_index();
        let expected_rows = expected.row_index();

        let column_pairs: Vec<(usize, Option<usize>)> = expected
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, name)| (idx, actual.column_index(name)))
            .collect();
        let extra_columns: Vec<usize> = actual
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, name)| expected.column_index(name).is_none())
            .map(|(idx, _)| idx)
            .collect();

        let mut seen_expected = HashSet::new();
        for (key, expected_cells) in expected.rows() {
            // Repeated keys are compared once; later copies are reported as extras.
            if !seen_expected.insert(key.as_str()) {
                for (e_idx, column) in expected.columns().iter().enumerate() {
                    comparison.mismatches.push(Mismatch {
                        row: key.clone(),
                        column: column.clone(),
                        expected: Some(expected_cells[e_idx].clone()),
                        actual: None,
                    });
                }
                continue;
            }
            let actual_cells = actual_rows.get(key.as_str()).map(|&i| &actual.rows()[i].1);

            for &(e_idx, a_idx) in &column_pairs {
                let expected_cell = &expected_cells[e_idx];
                let actual_cell = actual_cells.zip(a_idx).map(|(cells, i)| &cells[i]);
                comparison.cells_compared += 1;

                let matched = actual_cell
                    .map(|cell| self.cells_match(expected_cell, cell))
                    .unwrap_or(false);
                if !matched {
                    comparison.mismatches.push(Mismatch {
                        row: key.clone(),
                        column: expected.columns()[e_idx].clone(),
                        expected: Some(expected_cell.clone()),
                        actual: actual_cell.cloned(),
                    });
                }
            }

            if let Some(cells) = actual_cells {
                for &a_idx in &extra_columns {
                    comparison.mismatches.push(Mismatch {
                        row: key.clone(),
                        column: actual.columns()[a_idx].clone(),
                        expected: None,
                        actual: Some(cells[a_idx].clone()),
                    });
                }
            }
        }

        let mut seen_actual = HashSet::new();
        for (key, actual_cells) in actual.rows() {
            let first = seen_actual.insert(key.as_str());
            if first && expected_rows.contains_key(key.as_str()) {
                continue;
            }
            for (a_idx, column) in actual.columns().iter().enumerate() {
                comparison.mismatches.push(Mismatch {
                    row: key.clone(),
                    column: column.clone(),
                    expected: None,
                    actual: Some(actual_cells[a_idx].clone()),
                });
            }
        }

        comparison
    }
}

fn fill_nan(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, &[f64])]) -> MetricTable {
        let mut table = MetricTable::new(["mean", "variance"]);
        for (key, values) in rows {
            table.push_row(*key, values.iter().map(|&v| Cell::Number(v)).collect());
        }
        table
    }

    #[test]
    fn tolerance_is_absolute_plus_relative() {
        let cmp = ToleranceComparator::default();
        assert!(cmp.values_match(1.0, 1.0 + 5e-6));
        assert!(!cmp.values_match(1.0, 1.0 + 5e-5));
        assert!(cmp.values_match(0.0, 5e-9));
        assert!(!cmp.values_match(0.0, 5e-8));
        assert!(cmp.values_match(f64::INFINITY, f64::INFINITY));
        assert!(!cmp.values_match(f64::INFINITY, f64::NEG_INFINITY));
    }

    #[test]
    fn strict_policy_only_matches_nan_with_nan() {
        let cmp = ToleranceComparator::default();
        assert!(cmp.values_match(f64::NAN, f64::NAN));
        assert!(!cmp.values_match(f64::NAN, 0.0));
        assert!(!cmp.values_match(0.0, f64::NAN));
    }

    #[test]
    fn fill_zero_policy_treats_nan_as_zero() {
        let cmp = ToleranceComparator::default().with_nan_policy(NanPolicy::FillZero);
        assert!(cmp.values_match(f64::NAN, f64::NAN));
        assert!(cmp.values_match(f64::NAN, 0.0));
        assert!(cmp.values_match(0.0, f64::NAN));
        assert!(!cmp.values_match(f64::NAN, 1.0));
    }

    #[test]
    fn reports_every_offending_cell() {
        let expected = table(&[("ACTB", &[30.0, f64::NAN]), ("GAPDH", &[31.0, 2.0])]);
        let actual = table(&[("GAPDH", &[31.5, 2.0]), ("ACTB", &[30.0, 0.0])]);

        let result = ToleranceComparator::default().compare(&expected, &actual);
        assert!(!result.passed());
        assert_eq!(result.cells_compared, 4);
        assert_eq!(result.mismatches.len(), 2);
        assert_eq!(result.mismatches[0].row, "ACTB");
        assert_eq!(result.mismatches[0].column, "variance");
        assert_eq!(result.mismatches[1].row, "GAPDH");
        assert_eq!(result.mismatches[1].column, "mean");
        assert_eq!(result.mismatches[1].actual, Some(Cell::Number(31.5)));

        let lenient = ToleranceComparator::default()
            .with_nan_policy(NanPolicy::FillZero)
            .compare(&expected, &actual);
        assert_eq!(lenient.mismatches.len(), 1);
    }

    #[test]
    fn missing_rows_and_columns_are_mismatches() {
        let expected = table(&[("ACTB", &[30.0, 1.0])]);
        let mut actual = MetricTable::new(["mean", "extra"]);
        actual.push_row("ACTB", vec![Cell::Number(30.0), Cell::Number(9.0)]);
        actual.push_row("NEW", vec![Cell::Number(1.0), Cell::Number(2.0)]);

        let result = ToleranceComparator::default().compare(&expected, &actual);
        let described: Vec<String> = result.mismatches.iter().map(|m| m.to_string()).collect();
        assert_eq!(
            described,
            vec![
                "ACTB / variance: expected 1, actual <missing>",
                "ACTB / extra: expected <missing>, actual 9",
                "NEW / mean: expected <missing>, actual 1",
                "NEW / extra: expected <missing>, actual 2",
            ]
        );
    }

    #[test]
    fn duplicated_row_keys_never_pass() {
        let expected = table(&[("ACTB", &[1.0, 2.0])]);
        let actual = table(&[("ACTB", &[999.0, 2.0]), ("ACTB", &[1.0, 2.0])]);

        let result = ToleranceComparator::default().compare(&expected, &actual);
        assert!(!result.passed());
        let described: Vec<String> = result.mismatches.iter().map(|m| m.to_string()).collect();
        assert_eq!(
            described,
            vec![
                "ACTB / mean: expected 1, actual 999",
                "ACTB / mean: expected <missing>, actual 1",
                "ACTB / variance: expected <missing>, actual 2",
            ]
        );

        let repeated = table(&[("ACTB", &[1.0, 2.0]), ("ACTB", &[1.0, 2.0])]);
        let result = ToleranceComparator::default().compare(&repeated, &expected);
        assert_eq!(result.cells_compared, 2);
        assert_eq!(result.mismatches.len(), 2);
        assert!(result.mismatches.iter().all(|m| m.actual.is_none()));
    }

    #[test]
    fn identical_tables_pass() {
        let expected = table(&[("A", &[1.0, f64::NAN])]);
        assert!(ToleranceComparator::default().compare(&expected, &expected.clone()).passed());
    }
}
