use super::AppContext;
use crate::bio::taxdump::TaxdumpDir;
use crate::cli::output::{self, print_json, print_json_pretty};
use crate::core::config::save_config;
use crate::core::paths::taxaquery_home;
use crate::download::TaxdumpClient;
use crate::storage::{build_database, IngestSummary, SqliteTaxonStore, TaxonStore};
use clap::{ArgGroup, Args};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("action").required(true).multiple(false)))]
pub struct TaxonomyArgs {
    /// List the taxonomy dump URLs published by NCBI
    #[arg(long, group = "action")]
    pub get: bool,

    /// Download the dump at URL, rebuild the database and remember the URL
    #[arg(long, value_name = "URL", group = "action")]
    pub set: Option<String>,

    /// Rebuild the database from an already extracted dump directory
    #[arg(long, value_name = "DIR", group = "action")]
    pub build: Option<PathBuf>,

    /// Show where the database came from
    #[arg(long, group = "action")]
    pub info: bool,
}

#[derive(Debug, Serialize)]
struct DatabaseInfo {
    home: String,
    config: String,
    database: String,
    source_url: Option<String>,
    built_at: Option<String>,
    taxa: usize,
}

pub fn run(args: TaxonomyArgs, ctx: &AppContext) -> anyhow::Result<()> {
    if args.get {
        let listing = TaxdumpClient::new()?.list_taxdump_urls()?;
        print_json_pretty(&listing)
    } else if let Some(url) = args.set {
        set_url(ctx, &url)
    } else if let Some(dir) = args.build {
        let dump_dir = TaxdumpDir::new(&dir);
        output::action(&format!("Reading taxonomy dump from {}", dump_dir.path().display()));
        let dump = dump_dir.read()?;
        let summary = build_database(&ctx.db_path, &dump, None)?;
        report_build(ctx, &summary);
        print_json(&summary)
    } else if args.info {
        let store = SqliteTaxonStore::open(&ctx.db_path)?;
        print_json_pretty(&DatabaseInfo {
            home: taxaquery_home().display().to_string(),
            config: ctx.config_path.display().to_string(),
            database: store.path().display().to_string(),
            source_url: store.source_url()?,
            built_at: store.built_at()?,
            taxa: store.taxa_count()?,
        })
    } else {
        anyhow::bail!("Usage: taxaquery taxonomy -h")
    }
}

fn set_url(ctx: &AppContext, url: &str) -> anyhow::Result<()> {
    output::action(&format!("Building taxonomy database from {}", url));
    let summary = TaxdumpClient::new()?.build_from_url(url, &ctx.db_path)?;
    report_build(ctx, &summary);

    let mut config = ctx.config.clone();
    if config.database.taxonomy_url != url {
        config.database.taxonomy_url = url.to_string();
        save_config(&ctx.config_path, &config)?;
        output::info(&format!("Saved taxonomy URL to {}", ctx.config_path.display()));
    }

    print_json(&summary)
}

fn report_build(ctx: &AppContext, summary: &IngestSummary) {
    output::success(&format!(
        "Wrote {} taxa ({} deleted, {} merged) to {}",
        output::format_number(summary.taxa),
        output::format_number(summary.deleted),
        output::format_number(summary.merged),
        ctx.db_path.display()
    ));
}
