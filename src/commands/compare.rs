use crate::api::{compare_table_files, TableKind};
use crate::cli::CompareArgs;
use crate::config::Config;
use crate::gene_metrics::ToleranceComparator;
use anyhow::{bail, Result};

fn resolve_comparator(args: &CompareArgs, config: &Config) -> ToleranceComparator {
    let mut comparator = ToleranceComparator::from(config.tolerance);
    if let Some(abs_tol) = args.abs_tol {
        comparator.abs_tol = abs_tol;
    }
    if let Some(rel_tol) = args.rel_tol {
        comparator.rel_tol = rel_tol;
    }
    if let Some(nan_policy) = args.nan_policy {
        comparator.nan_policy = nan_policy;
    }
    comparator
}

pub fn run(args: CompareArgs, config: &Config) -> Result<()> {
    let comparator = resolve_comparator(&args, config);
    let kind = if args.summary {
        TableKind::Summary
    } else {
        TableKind::Keyed
    };

    let comparison = compare_table_files(&args.expected, &args.actual, kind, &comparator)?;
    if comparison.passed() {
        println!(
            "{} cells match within abs {:e} / rel {:e}",
            comparison.cells_compared, comparator.abs_tol, comparator.rel_tol
        );
        return Ok(());
    }

    for mismatch in comparison.mismatches.iter().take(args.max_diffs) {
        println!("  {}", mismatch);
    }
    if comparison.mismatches.len() > args.max_diffs {
        println!(
            "  ... and {} more",
            comparison.mismatches.len() - args.max_diffs
        );
    }
    bail!(
        "{} mismatches between {} and {}",
        comparison.mismatches.len(),
        args.expected.display(),
        args.actual.display()
    )
}
