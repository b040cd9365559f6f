pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "taxaquery",
    version,
    about = "Ancestry, common-ancestor and classification queries over the NCBI taxonomy",
    long_about = "taxaquery answers questions about NCBI taxids from a local SQLite copy of the \
                  NCBI taxonomy dump: parents, ranks, lineages, common ancestors, superkingdom \
                  membership, viral classification and merge/deletion status. Results are \
                  printed as JSON.",
    after_help = "Subcommands have their own help available with -h"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Taxonomy database to query (defaults to ~/.taxaquery/taxa.db)
    #[arg(long, value_name = "PATH", env = "TAXAQUERY_DB", global = true)]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Return a taxid
    Taxid(commands::taxid::TaxidArgs),

    /// Return a full taxon record
    Record(commands::record::RecordArgs),

    /// Check lineage relationships, classification and status
    Check(commands::check::CheckArgs),

    /// List taxonomy dump URLs and (re)build the local database
    Taxonomy(commands::taxonomy::TaxonomyArgs),
}
