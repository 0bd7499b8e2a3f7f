use clap::Parser;
use scqc_tools::cli::{Args, Commands};
use scqc_tools::commands;
use scqc_tools::config::Config;

fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load(),
    };

    match args.command {
        Commands::GeneMetrics(gene_metrics) => commands::gene_metrics::run(gene_metrics, &config),
        Commands::Compare(compare) => commands::compare::run(compare, &config),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
