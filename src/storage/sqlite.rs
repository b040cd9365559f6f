//! SQLite-backed taxon store.
//!
//! The connection is opened read-only once and held for the lifetime of the
//! store. `rusqlite::Connection` is `Send` but not `Sync`, so it sits behind
//! a mutex; every query goes through `prepare_cached`.

use super::schema::{self, METADATA_BUILT_AT, METADATA_SOURCE_URL};
use super::traits::TaxonStore;
use crate::bio::taxon_id::TaxonId;
use crate::bio::taxonomy::TaxonRecord;
use crate::{Result, TaxaError};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};

const SELECT_RECORD_SQL: &str =
    "SELECT taxid, name, rank, parent_taxid FROM taxa WHERE taxid = ?1";
const SELECT_PARENT_SQL: &str = "SELECT parent_taxid FROM taxa WHERE taxid = ?1";
const SELECT_DELETED_SQL: &str = "SELECT 1 FROM deleted_taxa WHERE taxid = ?1";
const SELECT_MERGED_SQL: &str = "SELECT new_taxid FROM merged_taxa WHERE old_taxid = ?1";
const SELECT_METADATA_SQL: &str = "SELECT value FROM metadata WHERE key = ?1";

pub struct SqliteTaxonStore {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl std::fmt::Debug for SqliteTaxonStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteTaxonStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteTaxonStore {
    /// Open an existing store read-only
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TaxaError::NotFound(format!(
                "taxonomy database {}",
                path.display()
            )));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let missing = schema::missing_tables(&conn)?;
        if !missing.is_empty() {
            return Err(TaxaError::Database(format!(
                "{} is missing tables: {}",
                path.display(),
                missing.join(", ")
            )));
        }

        tracing::debug!("Opened taxonomy store at {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(SELECT_METADATA_SQL)?;
        let value = stmt
            .query_row(params![key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(value)
    }

    /// URL of the dump the store was built from, if recorded
    pub fn source_url(&self) -> Result<Option<String>> {
        self.metadata(METADATA_SOURCE_URL)
    }

    pub fn built_at(&self) -> Result<Option<String>> {
        self.metadata(METADATA_BUILT_AT)
    }
}

impl TaxonStore for SqliteTaxonStore {
    fn fetch_record(&self, taxid: TaxonId) -> Result<Option<TaxonRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(SELECT_RECORD_SQL)?;
        let record = stmt
            .query_row(params![taxid.0], |row| {
                Ok(TaxonRecord {
                    taxid: TaxonId(row.get(0)?),
                    name: row.get(1)?,
                    rank: row.get(2)?,
                    parent_taxid: TaxonId(row.get(3)?),
                })
            })
            .optional()?;
        Ok(record)
    }

    fn fetch_parent_taxid(&self, taxid: TaxonId) -> Result<Option<TaxonId>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(SELECT_PARENT_SQL)?;
        let parent = stmt
            .query_row(params![taxid.0], |row| row.get::<_, u32>(0))
            .optional()?;
        Ok(parent.map(TaxonId))
    }

    fn is_deleted(&self, taxid: TaxonId) -> Result<bool> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(SELECT_DELETED_SQL)?;
        Ok(stmt.exists(params![taxid.0])?)
    }

    fn fetch_merged_target(&self, taxid: TaxonId) -> Result<Option<TaxonId>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(SELECT_MERGED_SQL)?;
        let target = stmt
            .query_row(params![taxid.0], |row| row.get::<_, u32>(0))
            .optional()?;
        Ok(target.map(TaxonId))
    }

    fn taxa_count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached("SELECT count(*) FROM taxa")?;
        let count: i64 = stmt.query_row([], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::taxdump::Taxdump;
    use crate::storage::builder::build_database;
    use tempfile::TempDir;

    fn small_store(dir: &TempDir) -> SqliteTaxonStore {
        let dump = Taxdump {
            records: vec![
                TaxonRecord::new(1u32, "root", Some("no rank"), 1u32),
                TaxonRecord::new(2u32, "Bacteria", Some("superkingdom"), 1u32),
                TaxonRecord::new(99u32, "unranked", None, 2u32),
            ],
            deleted: vec![TaxonId(3467805)],
            merged: vec![(TaxonId(12), TaxonId(74109))],
        };
        let path = dir.path().join("taxa.db");
        build_database(&path, &dump, Some("file:///fixture")).unwrap();
        SqliteTaxonStore::open(&path).unwrap()
    }

    #[test]
    fn test_record_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = small_store(&dir);

        let root = store.fetch_record(TaxonId::ROOT).unwrap().unwrap();
        assert_eq!(root, TaxonRecord::new(1u32, "root", Some("no rank"), 1u32));

        let unranked = store.fetch_record(TaxonId(99)).unwrap().unwrap();
        assert_eq!(unranked.rank, None);

        assert_eq!(store.fetch_record(TaxonId(5)).unwrap(), None);
        assert_eq!(store.fetch_parent_taxid(TaxonId(2)).unwrap(), Some(TaxonId(1)));
        assert_eq!(store.taxa_count().unwrap(), 3);
    }

    #[test]
    fn test_status_tables() {
        let dir = TempDir::new().unwrap();
        let store = small_store(&dir);

        assert!(store.is_deleted(TaxonId(3467805)).unwrap());
        assert!(!store.is_deleted(TaxonId(2)).unwrap());
        assert_eq!(store.fetch_merged_target(TaxonId(12)).unwrap(), Some(TaxonId(74109)));
        assert_eq!(store.fetch_merged_target(TaxonId(2)).unwrap(), None);
        assert_eq!(store.source_url().unwrap().as_deref(), Some("file:///fixture"));
        assert!(store.built_at().unwrap().is_some());
    }

    #[test]
    fn test_open_missing_database() {
        let dir = TempDir::new().unwrap();
        let err = SqliteTaxonStore::open(dir.path().join("nope.db")).unwrap_err();
        assert!(matches!(err, TaxaError::NotFound(_)));
    }

    #[test]
    fn test_open_rejects_foreign_database() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE unrelated (id INTEGER)")
            .unwrap();

        let err = SqliteTaxonStore::open(&path).unwrap_err();
        assert!(matches!(err, TaxaError::Database(_)));
    }
}
