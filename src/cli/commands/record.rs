use super::AppContext;
use crate::cli::output::print_json;
use clap::{ArgGroup, Args};

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("query").required(true).multiple(false)))]
pub struct RecordArgs {
    /// Get the parent record
    #[arg(long, value_name = "TAXID", group = "query")]
    pub parent: Option<String>,

    /// Get the record for the input taxid
    #[arg(long, value_name = "TAXID", group = "query")]
    pub record: Option<String>,

    /// Get the record for the closest common parent taxon between two taxids
    #[arg(long, num_args = 2, value_names = ["TAXID", "TAXID"], group = "query")]
    pub common: Option<Vec<String>>,
}

pub fn run(args: RecordArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let engine = ctx.open_engine()?;

    if let Some(taxid) = args.parent {
        print_json(&engine.parent_record(taxid.as_str())?)
    } else if let Some(taxid) = args.record {
        print_json(&engine.record(taxid.as_str())?)
    } else if let Some(pair) = args.common {
        print_json(&engine.common_parent_record(pair[0].as_str(), pair[1].as_str())?)
    } else {
        anyhow::bail!("Usage: taxaquery record -h")
    }
}
