/// Static classification tables (phages, Baltimore groups, viral realms)
///
/// The tables are opaque data: the engine only tests ancestor membership
/// against their keys. A small default set is compiled in; a complete set
/// can be supplied as a JSON file with the same layout.
use crate::bio::taxon_id::TaxonId;
use crate::{Result, TaxaError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUNDLED_TABLES: &str = include_str!("../../data/classification_tables.json");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationTables {
    /// Phage taxid -> description
    #[serde(default)]
    pub phages: IndexMap<TaxonId, String>,
    /// Virus taxid -> Baltimore label (e.g. "-ssRNA")
    #[serde(default)]
    pub baltimore: IndexMap<TaxonId, String>,
    /// Virus taxid -> realm name
    #[serde(default)]
    pub viral_realms: IndexMap<TaxonId, String>,
}

impl ClassificationTables {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_TABLES)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TaxaError::Parse(format!("classification tables: {}", e)))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let tables = Self::from_json(&contents)?;
        tracing::debug!(
            "Loaded {} phage, {} Baltimore and {} realm entries from {}",
            tables.phages.len(),
            tables.baltimore.len(),
            tables.viral_realms.len(),
            path.display()
        );
        Ok(tables)
    }

    /// Tables from `path` when given, otherwise the bundled defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_json_file(path),
            None => Self::bundled(),
        }
    }
}
