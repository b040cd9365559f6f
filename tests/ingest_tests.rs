mod common;

use common::{fixture_dir, TestEnvironment, FIXTURE_URL};
use std::fs;
use taxaquery::bio::taxdump::TaxdumpDir;
use taxaquery::core::{ClassificationTables, TaxonomyEngine};
use taxaquery::storage::{build_database, IngestSummary, SqliteTaxonStore, TaxonStore};
use taxaquery::{TaxaError, TaxonId};
use tempfile::TempDir;

#[test]
fn test_fixture_ingest_counts() {
    let env = TestEnvironment::new();
    assert_eq!(
        env.summary,
        IngestSummary {
            taxa: 74,
            deleted: 2,
            merged: 1
        }
    );

    let store = SqliteTaxonStore::open(&env.db_path).unwrap();
    assert_eq!(store.taxa_count().unwrap(), 74);
    assert_eq!(store.source_url().unwrap().as_deref(), Some(FIXTURE_URL));
    assert!(store.built_at().unwrap().is_some());
}

#[test]
fn test_empty_rank_is_stored_as_null() {
    let env = TestEnvironment::new();
    let store = SqliteTaxonStore::open(&env.db_path).unwrap();

    let record = store.fetch_record(TaxonId(48510)).unwrap().unwrap();
    assert_eq!(record.name, "environmental samples");
    assert_eq!(record.rank, None);
}

#[test]
fn test_classic_taxdump_names() {
    let temp_dir = TempDir::new().unwrap();
    let dump_dir = temp_dir.path().join("taxdump");
    fs::create_dir_all(&dump_dir).unwrap();

    fs::write(
        dump_dir.join("nodes.dmp"),
        "1\t|\t1\t|\tno rank\t|\t\t|\n\
         2\t|\t131567\t|\tsuperkingdom\t|\t\t|\n\
         131567\t|\t1\t|\tno rank\t|\t\t|\n",
    )
    .unwrap();
    fs::write(
        dump_dir.join("names.dmp"),
        "1\t|\tall\t|\t\t|\tsynonym\t|\n\
         1\t|\troot\t|\t\t|\tscientific name\t|\n\
         2\t|\teubacteria\t|\t\t|\tgenbank common name\t|\n\
         2\t|\tBacteria\t|\tBacteria <bacteria>\t|\tscientific name\t|\n\
         131567\t|\tcellular organisms\t|\t\t|\tscientific name\t|\n",
    )
    .unwrap();

    let dump = TaxdumpDir::new(&dump_dir).read().unwrap();
    assert_eq!(dump.records.len(), 3);
    assert!(dump.deleted.is_empty());
    assert!(dump.merged.is_empty());

    let db_path = temp_dir.path().join("taxa.db");
    build_database(&db_path, &dump, None).unwrap();

    let engine = TaxonomyEngine::open(&db_path, ClassificationTables::empty()).unwrap();
    assert_eq!(engine.record(2u32).unwrap().unwrap().name, "Bacteria");
    assert_eq!(engine.record(1u32).unwrap().unwrap().name, "root");
    assert!(engine.is_bacteria(2u32).unwrap());
}

#[test]
fn test_malformed_lines_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    for file in ["nodes.dmp", "fullnamelineage.dmp", "delnodes.dmp", "merged.dmp"] {
        fs::copy(fixture_dir().join(file), temp_dir.path().join(file)).unwrap();
    }

    let mut nodes = fs::read_to_string(temp_dir.path().join("nodes.dmp")).unwrap();
    nodes.push_str("abc\t|\t1\t|\tspecies\t|\n");
    nodes.push_str("truncated line\n");
    fs::write(temp_dir.path().join("nodes.dmp"), nodes).unwrap();

    let dump = TaxdumpDir::new(temp_dir.path()).read().unwrap();
    assert_eq!(dump.records.len(), 74);
}

#[test]
fn test_missing_nodes_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = TaxdumpDir::new(temp_dir.path()).read().unwrap_err();
    assert!(matches!(err, TaxaError::NotFound(_)));
}

#[test]
fn test_open_missing_store() {
    let temp_dir = TempDir::new().unwrap();
    let err = SqliteTaxonStore::open(temp_dir.path().join("absent.db")).unwrap_err();
    assert!(matches!(err, TaxaError::NotFound(_)));
}

#[test]
fn test_open_foreign_sqlite_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("other.db");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE unrelated (id INTEGER);").unwrap();
    }

    let err = SqliteTaxonStore::open(&path).unwrap_err();
    assert!(matches!(err, TaxaError::Database(_)));
}
