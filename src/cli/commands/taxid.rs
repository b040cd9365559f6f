use super::AppContext;
use crate::cli::output::print_json;
use clap::{ArgGroup, Args};

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("query").required(true).multiple(false)))]
pub struct TaxidArgs {
    /// Get the parent taxid
    #[arg(long, value_name = "TAXID", group = "query")]
    pub parent: Option<String>,

    /// Get the taxid corresponding to the genus
    #[arg(long, value_name = "TAXID", group = "query")]
    pub genus: Option<String>,

    /// Get the taxid corresponding to the species
    #[arg(long, value_name = "TAXID", group = "query")]
    pub species: Option<String>,

    /// Get the taxid corresponding to the superkingdom
    #[arg(long, value_name = "TAXID", group = "query")]
    pub superkingdom: Option<String>,

    /// Get taxids for all parents
    #[arg(long, value_name = "TAXID", group = "query")]
    pub parents_all: Option<String>,

    /// Get the taxid for the closest common parent taxon between two taxids
    #[arg(long, num_args = 2, value_names = ["TAXID", "TAXID"], group = "query")]
    pub common: Option<Vec<String>>,
}

pub fn run(args: TaxidArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let engine = ctx.open_engine()?;

    if let Some(taxid) = args.parent {
        print_json(&engine.parent_taxid(taxid.as_str())?)
    } else if let Some(taxid) = args.genus {
        print_json(&engine.genus_taxid(taxid.as_str())?)
    } else if let Some(taxid) = args.species {
        print_json(&engine.species_taxid(taxid.as_str())?)
    } else if let Some(taxid) = args.superkingdom {
        print_json(&engine.superkingdom_taxid(taxid.as_str())?)
    } else if let Some(taxid) = args.parents_all {
        print_json(&engine.all_parent_taxids(taxid.as_str(), false)?)
    } else if let Some(pair) = args.common {
        print_json(&engine.common_parent_taxid(pair[0].as_str(), pair[1].as_str())?)
    } else {
        anyhow::bail!("Usage: taxaquery taxid -h")
    }
}
