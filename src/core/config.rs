use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TAXONOMY_URL: &str =
    "https://ftp.ncbi.nih.gov/pub/taxonomy/new_taxdump/new_taxdump.tar.gz";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub classification: ClassificationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite store location (defaults to ~/.taxaquery/taxa.db)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Dump archive used when the store is (re)built
    pub taxonomy_url: String,
    /// Download and build the store on first use if it is missing
    pub auto_build: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// JSON file replacing the bundled phage/Baltimore/realm tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            taxonomy_url: DEFAULT_TAXONOMY_URL.to_string(),
            auto_build: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, crate::TaxaError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| crate::TaxaError::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), crate::TaxaError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| crate::TaxaError::Config(format!("Failed to serialize config: {}", e)))?;
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}

/// Config from `path` if the file exists, defaults otherwise
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Config, crate::TaxaError> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!("No config at {}, using defaults", path.display());
        Ok(default_config())
    }
}
