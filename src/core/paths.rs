use std::path::PathBuf;
use std::sync::OnceLock;

// Cache the paths to avoid repeated environment lookups
static TAXAQUERY_HOME: OnceLock<PathBuf> = OnceLock::new();
static TAXAQUERY_DB: OnceLock<PathBuf> = OnceLock::new();

pub const DATABASE_FILE: &str = "taxa.db";
pub const CONFIG_FILE: &str = "config.toml";

/// Get the taxaquery home directory
/// Checks TAXAQUERY_HOME environment variable, falls back to ${HOME}/.taxaquery
pub fn taxaquery_home() -> PathBuf {
    TAXAQUERY_HOME
        .get_or_init(|| {
            if let Ok(path) = std::env::var("TAXAQUERY_HOME") {
                PathBuf::from(path)
            } else {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".taxaquery")
            }
        })
        .clone()
}

/// Get the default store location
/// Checks TAXAQUERY_DB environment variable, falls back to TAXAQUERY_HOME/taxa.db
pub fn default_database_path() -> PathBuf {
    TAXAQUERY_DB
        .get_or_init(|| {
            if let Ok(path) = std::env::var("TAXAQUERY_DB") {
                PathBuf::from(path)
            } else {
                taxaquery_home().join(DATABASE_FILE)
            }
        })
        .clone()
}

pub fn config_path() -> PathBuf {
    taxaquery_home().join(CONFIG_FILE)
}

/// Store path with precedence: explicit flag, config file, environment/default
pub fn resolve_database_path(flag: Option<PathBuf>, configured: Option<PathBuf>) -> PathBuf {
    flag.or(configured).unwrap_or_else(default_database_path)
}
