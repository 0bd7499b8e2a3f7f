pub mod gene_metrics;
