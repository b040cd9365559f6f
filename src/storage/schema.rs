//! SQLite schema for the taxonomy store.

use rusqlite::Connection;

pub const CREATE_TAXA: &str = "\
CREATE TABLE taxa (
  taxid INTEGER PRIMARY KEY,
  name TEXT NOT NULL,
  rank TEXT,
  parent_taxid INTEGER NOT NULL
)";

pub const CREATE_DELETED_TAXA: &str = "\
CREATE TABLE deleted_taxa (
  taxid INTEGER PRIMARY KEY
)";

pub const CREATE_MERGED_TAXA: &str = "\
CREATE TABLE merged_taxa (
  old_taxid INTEGER PRIMARY KEY,
  new_taxid INTEGER NOT NULL
)";

pub const CREATE_METADATA: &str = "\
CREATE TABLE metadata (
  key TEXT PRIMARY KEY,
  value TEXT NOT NULL
)";

const DROP_TABLES: &[&str] = &[
    "DROP TABLE IF EXISTS taxa",
    "DROP TABLE IF EXISTS deleted_taxa",
    "DROP TABLE IF EXISTS merged_taxa",
    "DROP TABLE IF EXISTS metadata",
];

/// Tables every usable store must have
pub const REQUIRED_TABLES: &[&str] = &["taxa", "deleted_taxa", "merged_taxa"];

pub const METADATA_SOURCE_URL: &str = "ncbi_taxonomy_data_url";
pub const METADATA_BUILT_AT: &str = "built_at";

/// Drop and recreate every table. The store is always rebuilt wholesale.
pub fn recreate_tables(conn: &Connection) -> rusqlite::Result<()> {
    for ddl in DROP_TABLES {
        conn.execute_batch(ddl)?;
    }
    conn.execute_batch(CREATE_TAXA)?;
    conn.execute_batch(CREATE_DELETED_TAXA)?;
    conn.execute_batch(CREATE_MERGED_TAXA)?;
    conn.execute_batch(CREATE_METADATA)?;
    Ok(())
}

/// Names of the required tables missing from `conn`
pub fn missing_tables(conn: &Connection) -> rusqlite::Result<Vec<&'static str>> {
    let mut stmt =
        conn.prepare("SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
    let mut missing = Vec::new();
    for table in REQUIRED_TABLES {
        let count: i64 = stmt.query_row([table], |row| row.get(0))?;
        if count == 0 {
            missing.push(*table);
        }
    }
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recreate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        recreate_tables(&conn).unwrap();
        conn.execute("INSERT INTO taxa VALUES (1, 'root', 'no rank', 1)", [])
            .unwrap();
        recreate_tables(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT count(*) FROM taxa", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert!(missing_tables(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_missing_tables_reported() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_TAXA).unwrap();
        assert_eq!(missing_tables(&conn).unwrap(), vec!["deleted_taxa", "merged_taxa"]);
    }
}
