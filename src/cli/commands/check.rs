use super::AppContext;
use crate::cli::output::{self, print_json};
use clap::{ArgGroup, Args};

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("query").required(true).multiple(false)))]
pub struct CheckArgs {
    /// Check the number of levels between two taxids
    #[arg(long, num_args = 2, value_names = ["TAXID", "TAXID"], group = "query")]
    pub levels_between: Option<Vec<String>>,

    /// Display the merged lineage tree for one or more taxids
    #[arg(long, num_args = 1.., value_name = "TAXID", group = "query")]
    pub graph: Option<Vec<String>>,

    /// Check if a taxid is an archaeon
    #[arg(long, value_name = "TAXID", group = "query")]
    pub is_archaea: Option<String>,

    /// Check if a taxid is a bacterium
    #[arg(long, value_name = "TAXID", group = "query")]
    pub is_bacteria: Option<String>,

    /// Check if a taxid is a eukaryote
    #[arg(long, value_name = "TAXID", group = "query")]
    pub is_eukaryote: Option<String>,

    /// Check if a taxid is a virus
    #[arg(long, value_name = "TAXID", group = "query")]
    pub is_virus: Option<String>,

    /// Check if a taxid is a phage
    #[arg(long, value_name = "TAXID", group = "query")]
    pub is_phage: Option<String>,

    /// Check if a taxid has been merged or removed
    #[arg(long, value_name = "TAXID", group = "query")]
    pub status: Option<String>,

    /// Check the Baltimore classification of a virus
    #[arg(long, value_name = "TAXID", group = "query")]
    pub baltimore: Option<String>,

    /// Check the realm of a virus
    #[arg(long, value_name = "TAXID", group = "query")]
    pub viral_realm: Option<String>,
}

pub fn run(args: CheckArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let engine = ctx.open_engine()?;

    if let Some(pair) = args.levels_between {
        print_json(&engine.levels_between(pair[0].as_str(), pair[1].as_str())?)
    } else if let Some(taxids) = args.graph {
        let graph = engine.lineage_graph(&taxids)?;
        if graph.node_count() == 0 {
            output::warning("None of the given taxids are in the database");
            return Ok(());
        }
        print!("{}", graph.render());
        Ok(())
    } else if let Some(taxid) = args.is_archaea {
        print_json(&engine.is_archaea(taxid.as_str())?)
    } else if let Some(taxid) = args.is_bacteria {
        print_json(&engine.is_bacteria(taxid.as_str())?)
    } else if let Some(taxid) = args.is_eukaryote {
        print_json(&engine.is_eukaryote(taxid.as_str())?)
    } else if let Some(taxid) = args.is_virus {
        print_json(&engine.is_virus(taxid.as_str())?)
    } else if let Some(taxid) = args.is_phage {
        print_json(&engine.is_phage(taxid.as_str())?)
    } else if let Some(taxid) = args.status {
        print_json(&engine.status(taxid.as_str())?)
    } else if let Some(taxid) = args.baltimore {
        print_json(&engine.baltimore_classification(taxid.as_str())?)
    } else if let Some(taxid) = args.viral_realm {
        print_json(&engine.viral_realm(taxid.as_str())?)
    } else {
        anyhow::bail!("Usage: taxaquery check -h")
    }
}
