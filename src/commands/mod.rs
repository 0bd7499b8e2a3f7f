pub mod compare;
pub mod gene_metrics;
