pub mod check;
pub mod record;
pub mod taxid;
pub mod taxonomy;

use crate::cli::output;
use crate::core::config::{self, Config};
use crate::core::paths;
use crate::core::{ClassificationTables, TaxonomyEngine};
use crate::download::TaxdumpClient;
use crate::TaxaError;
use anyhow::Context;
use std::path::PathBuf;

/// Resolved configuration shared by every subcommand
pub struct AppContext {
    pub config: Config,
    pub config_path: PathBuf,
    pub db_path: PathBuf,
}

impl AppContext {
    pub fn load(db_flag: Option<PathBuf>) -> anyhow::Result<Self> {
        let config_path = paths::config_path();
        let config = config::load_or_default(&config_path)?;
        let db_path = paths::resolve_database_path(db_flag, config.database.path.clone());
        tracing::debug!("Using database {}", db_path.display());

        Ok(Self {
            config,
            config_path,
            db_path,
        })
    }

    pub fn tables(&self) -> anyhow::Result<ClassificationTables> {
        let path = self.config.classification.tables_path.as_deref();
        ClassificationTables::load(path)
            .with_context(|| "Failed to load classification tables".to_string())
    }

    /// Open the store, building it from the configured URL on first use
    pub fn open_engine(&self) -> anyhow::Result<TaxonomyEngine> {
        if !self.db_path.exists() {
            if !self.config.database.auto_build {
                return Err(TaxaError::NotFound(format!(
                    "taxonomy database {} (run `taxaquery taxonomy --set <url>` to build it)",
                    self.db_path.display()
                ))
                .into());
            }

            let url = &self.config.database.taxonomy_url;
            output::action(&format!(
                "No taxonomy database at {}, building it from {}",
                self.db_path.display(),
                url
            ));
            let summary = TaxdumpClient::new()?.build_from_url(url, &self.db_path)?;
            output::success(&format!(
                "Built database with {} taxa",
                output::format_number(summary.taxa)
            ));
        }

        Ok(TaxonomyEngine::open(&self.db_path, self.tables()?)?)
    }
}
