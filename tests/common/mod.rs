//! Common test utilities for taxaquery tests
//!
//! Builds a SQLite taxonomy store from the fixture dump under
//! `tests/fixtures/taxdump` through the same ingest path the CLI uses.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use taxaquery::bio::taxdump::TaxdumpDir;
use taxaquery::core::{ClassificationTables, TaxonomyEngine};
use taxaquery::storage::{build_database, IngestSummary};
use tempfile::TempDir;

pub const FIXTURE_URL: &str = "file://tests/fixtures/taxdump";

pub fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/taxdump")
}

/// Test environment owning a temporary directory with a built store
pub struct TestEnvironment {
    temp_dir: TempDir,
    pub db_path: PathBuf,
    pub summary: IngestSummary,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("taxa.db");

        let dump = TaxdumpDir::new(fixture_dir())
            .read()
            .expect("Failed to read fixture dump");
        let summary =
            build_database(&db_path, &dump, Some(FIXTURE_URL)).expect("Failed to build store");

        TestEnvironment {
            temp_dir,
            db_path,
            summary,
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    pub fn engine(&self) -> TaxonomyEngine {
        TaxonomyEngine::open(&self.db_path, ClassificationTables::bundled().unwrap())
            .expect("Failed to open store")
    }
}
