use clap::Parser;
use colored::*;
use std::process;
use taxaquery::cli::commands::AppContext;
use taxaquery::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn log_level(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

fn main() {
    let cli = Cli::parse();

    let result = AppContext::load(cli.db.clone()).and_then(|ctx| {
        // TAXAQUERY_LOG wins over -v and the configured level
        let level = std::env::var("TAXAQUERY_LOG")
            .unwrap_or_else(|_| log_level(cli.verbose, &ctx.config.logging.level));

        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("warn")))
            .with_writer(std::io::stderr)
            .init();

        run(cli, &ctx)
    });

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<taxaquery::TaxaError>() {
            Some(taxaquery::TaxaError::Config(_)) => 2,
            Some(taxaquery::TaxaError::Io(_)) => 3,
            Some(taxaquery::TaxaError::Parse(_)) => 4,
            Some(taxaquery::TaxaError::Database(_)) | Some(taxaquery::TaxaError::NotFound(_)) => 5,
            Some(taxaquery::TaxaError::Network(_)) => 6,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli, ctx: &AppContext) -> anyhow::Result<()> {
    match cli.command {
        Commands::Taxid(args) => taxaquery::cli::commands::taxid::run(args, ctx),
        Commands::Record(args) => taxaquery::cli::commands::record::run(args, ctx),
        Commands::Check(args) => taxaquery::cli::commands::check::run(args, ctx),
        Commands::Taxonomy(args) => taxaquery::cli::commands::taxonomy::run(args, ctx),
    }
}
