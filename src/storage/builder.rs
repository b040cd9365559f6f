//! Builds the SQLite store from a parsed taxdump.
//!
//! The database is written next to its final location and renamed into
//! place, so readers either see the previous store or the complete new one.

use super::schema::{self, METADATA_BUILT_AT, METADATA_SOURCE_URL};
use crate::bio::taxdump::Taxdump;
use crate::{Result, TaxaError};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const INSERT_TAXON_SQL: &str =
    "INSERT OR REPLACE INTO taxa (taxid, name, rank, parent_taxid) VALUES (?1, ?2, ?3, ?4)";
const INSERT_DELETED_SQL: &str = "INSERT OR IGNORE INTO deleted_taxa (taxid) VALUES (?1)";
const INSERT_MERGED_SQL: &str =
    "INSERT OR REPLACE INTO merged_taxa (old_taxid, new_taxid) VALUES (?1, ?2)";
const INSERT_METADATA_SQL: &str = "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)";

/// Row counts written by one build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub taxa: usize,
    pub deleted: usize,
    pub merged: usize,
}

fn staging_path(db_path: &Path) -> PathBuf {
    let mut name = db_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "taxa.db".into());
    name.push(".partial");
    db_path.with_file_name(name)
}

/// Write `dump` to a fresh database at `db_path`, replacing any existing one
pub fn build_database(
    db_path: impl AsRef<Path>,
    dump: &Taxdump,
    source_url: Option<&str>,
) -> Result<IngestSummary> {
    let db_path = db_path.as_ref();
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let staging = staging_path(db_path);
    if staging.exists() {
        fs::remove_file(&staging)?;
    }

    tracing::info!("Staging {}", staging.display());
    let summary = write_tables(&staging, dump, source_url).inspect_err(|_| {
        let _ = fs::remove_file(&staging);
    })?;

    fs::rename(&staging, db_path).map_err(|e| {
        TaxaError::Io(std::io::Error::new(
            e.kind(),
            format!("moving {} into place: {}", staging.display(), e),
        ))
    })?;

    tracing::info!(
        "Wrote {} taxa, {} deleted, {} merged to {}",
        summary.taxa,
        summary.deleted,
        summary.merged,
        db_path.display()
    );

    Ok(summary)
}

fn write_tables(path: &Path, dump: &Taxdump, source_url: Option<&str>) -> Result<IngestSummary> {
    let mut conn = Connection::open(path)?;
    conn.pragma_update(None, "journal_mode", "OFF")?;
    conn.pragma_update(None, "synchronous", "OFF")?;

    let tx = conn.transaction()?;
    schema::recreate_tables(&tx)?;

    {
        let mut stmt = tx.prepare_cached(INSERT_TAXON_SQL)?;
        for record in &dump.records {
            stmt.execute(params![
                record.taxid.0,
                record.name,
                record.rank,
                record.parent_taxid.0
            ])?;
        }

        let mut stmt = tx.prepare_cached(INSERT_DELETED_SQL)?;
        for taxid in &dump.deleted {
            stmt.execute(params![taxid.0])?;
        }

        let mut stmt = tx.prepare_cached(INSERT_MERGED_SQL)?;
        for (old, new) in &dump.merged {
            stmt.execute(params![old.0, new.0])?;
        }

        let mut stmt = tx.prepare_cached(INSERT_METADATA_SQL)?;
        if let Some(url) = source_url {
            stmt.execute(params![METADATA_SOURCE_URL, url])?;
        }
        stmt.execute(params![METADATA_BUILT_AT, chrono::Utc::now().to_rfc3339()])?;
    }

    tx.commit()?;

    Ok(IngestSummary {
        taxa: dump.records.len(),
        deleted: dump.deleted.len(),
        merged: dump.merged.len(),
    })
}
