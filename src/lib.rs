pub mod bio;
pub mod cli;
pub mod core;
pub mod download;
pub mod storage;

pub use crate::bio::taxon_id::{TaxidLike, TaxonId};
pub use crate::bio::taxonomy::{TaxonRecord, TaxonomicRank};
pub use crate::core::engine::TaxonomyEngine;
pub use crate::storage::{InMemoryTaxonStore, SqliteTaxonStore, TaxonStore};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaxaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

impl From<rusqlite::Error> for TaxaError {
    fn from(err: rusqlite::Error) -> Self {
        TaxaError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for TaxaError {
    fn from(err: serde_json::Error) -> Self {
        TaxaError::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for TaxaError {
    fn from(err: reqwest::Error) -> Self {
        TaxaError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TaxaError>;
