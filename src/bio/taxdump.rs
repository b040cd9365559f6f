/// Parsers for NCBI taxonomy dump files (taxdump and new_taxdump)
///
/// Every `.dmp` file uses `\t|\t` as the field separator and terminates each
/// line with `\t|`.
use super::taxon_id::TaxonId;
use super::taxonomy::TaxonRecord;
use crate::{Result, TaxaError};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

pub const NODES_FILE: &str = "nodes.dmp";
pub const NAMES_FILE: &str = "names.dmp";
pub const FULLNAMELINEAGE_FILE: &str = "fullnamelineage.dmp";
pub const DELNODES_FILE: &str = "delnodes.dmp";
pub const MERGED_FILE: &str = "merged.dmp";

/// Split one dump line into trimmed fields
pub fn split_fields(line: &str) -> Vec<&str> {
    let line = line.trim_end_matches(['\r', '\n']);
    let line = line.strip_suffix("\t|").unwrap_or(line);
    line.split("\t|\t").map(str::trim).collect()
}

fn parse_taxid(field: &str, path: &Path, line_no: usize) -> Option<TaxonId> {
    match field.parse::<TaxonId>() {
        Ok(id) => Some(id),
        Err(_) => {
            tracing::warn!(
                "{}:{}: skipping line with invalid taxid '{}'",
                path.display(),
                line_no,
                field
            );
            None
        }
    }
}

fn for_each_line<F>(path: &Path, mut f: F) -> Result<()>
where
    F: FnMut(usize, &str),
{
    let file = File::open(path).map_err(|e| {
        TaxaError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    let reader = BufReader::new(file);

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        f(idx + 1, &line);
    }

    Ok(())
}

/// nodes.dmp: taxid -> (parent taxid, rank)
pub fn load_nodes<P: AsRef<Path>>(path: P) -> Result<HashMap<TaxonId, (TaxonId, String)>> {
    let path = path.as_ref();
    let mut nodes = HashMap::new();

    for_each_line(path, |line_no, line| {
        let parts = split_fields(line);
        if parts.len() < 3 {
            tracing::warn!("{}:{}: expected at least 3 fields", path.display(), line_no);
            return;
        }
        if let (Some(taxid), Some(parent)) = (
            parse_taxid(parts[0], path, line_no),
            parse_taxid(parts[1], path, line_no),
        ) {
            nodes.insert(taxid, (parent, parts[2].to_string()));
        }
    })?;

    Ok(nodes)
}

/// names.dmp, keeping only the `scientific name` class
pub fn load_scientific_names<P: AsRef<Path>>(path: P) -> Result<HashMap<TaxonId, String>> {
    let path = path.as_ref();
    let mut names = HashMap::new();

    for_each_line(path, |line_no, line| {
        let parts = split_fields(line);
        if parts.len() >= 4 && parts[3] == "scientific name" {
            if let Some(taxid) = parse_taxid(parts[0], path, line_no) {
                names.insert(taxid, parts[1].to_string());
            }
        }
    })?;

    Ok(names)
}

/// fullnamelineage.dmp: taxid, name, lineage
pub fn load_fullnamelineage<P: AsRef<Path>>(path: P) -> Result<HashMap<TaxonId, String>> {
    let path = path.as_ref();
    let mut names = HashMap::new();

    for_each_line(path, |line_no, line| {
        let parts = split_fields(line);
        if parts.len() < 2 {
            tracing::warn!("{}:{}: expected at least 2 fields", path.display(), line_no);
            return;
        }
        if let Some(taxid) = parse_taxid(parts[0], path, line_no) {
            names.insert(taxid, parts[1].to_string());
        }
    })?;

    Ok(names)
}

/// delnodes.dmp: one withdrawn taxid per line
pub fn load_deleted<P: AsRef<Path>>(path: P) -> Result<Vec<TaxonId>> {
    let path = path.as_ref();
    let mut deleted = Vec::new();

    for_each_line(path, |line_no, line| {
        let parts = split_fields(line);
        if let Some(taxid) = parse_taxid(parts[0], path, line_no) {
            deleted.push(taxid);
        }
    })?;

    Ok(deleted)
}

/// merged.dmp: old taxid -> new taxid
pub fn load_merged<P: AsRef<Path>>(path: P) -> Result<Vec<(TaxonId, TaxonId)>> {
    let path = path.as_ref();
    let mut merged = Vec::new();

    for_each_line(path, |line_no, line| {
        let parts = split_fields(line);
        if parts.len() < 2 {
            tracing::warn!("{}:{}: expected 2 fields", path.display(), line_no);
            return;
        }
        if let (Some(old), Some(new)) = (
            parse_taxid(parts[0], path, line_no),
            parse_taxid(parts[1], path, line_no),
        ) {
            merged.push((old, new));
        }
    })?;

    Ok(merged)
}

/// Everything read out of one extracted dump directory
#[derive(Debug, Default)]
pub struct Taxdump {
    pub records: Vec<TaxonRecord>,
    pub deleted: Vec<TaxonId>,
    pub merged: Vec<(TaxonId, TaxonId)>,
}

/// An extracted taxdump or new_taxdump directory
#[derive(Debug, Clone)]
pub struct TaxdumpDir {
    root: PathBuf,
}

impl TaxdumpDir {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// new_taxdump ships fullnamelineage.dmp; the classic taxdump only has
    /// names.dmp
    fn names_path(&self) -> Result<PathBuf> {
        let lineage = self.root.join(FULLNAMELINEAGE_FILE);
        if lineage.exists() {
            return Ok(lineage);
        }
        let names = self.root.join(NAMES_FILE);
        if names.exists() {
            return Ok(names);
        }
        Err(TaxaError::NotFound(format!(
            "neither {} nor {} in {}",
            FULLNAMELINEAGE_FILE,
            NAMES_FILE,
            self.root.display()
        )))
    }

    pub fn read(&self) -> Result<Taxdump> {
        let nodes_path = self.root.join(NODES_FILE);
        if !nodes_path.exists() {
            return Err(TaxaError::NotFound(format!(
                "{} in {}",
                NODES_FILE,
                self.root.display()
            )));
        }

        tracing::info!("Processing {}", nodes_path.display());
        let nodes = load_nodes(&nodes_path)?;

        let names_path = self.names_path()?;
        tracing::info!("Processing {}", names_path.display());
        let names = if names_path.ends_with(FULLNAMELINEAGE_FILE) {
            load_fullnamelineage(&names_path)?
        } else {
            load_scientific_names(&names_path)?
        };

        let mut unnamed = 0usize;
        let mut records: Vec<TaxonRecord> = nodes
            .into_iter()
            .map(|(taxid, (parent, rank))| {
                let name = names.get(&taxid).cloned().unwrap_or_else(|| {
                    unnamed += 1;
                    String::new()
                });
                TaxonRecord {
                    taxid,
                    name,
                    rank: if rank.is_empty() { None } else { Some(rank) },
                    parent_taxid: parent,
                }
            })
            .collect();
        records.sort_by_key(|r| r.taxid);

        if unnamed > 0 {
            tracing::warn!("{} nodes have no scientific name", unnamed);
        }

        let deleted_path = self.root.join(DELNODES_FILE);
        let deleted = if deleted_path.exists() {
            tracing::info!("Processing {}", deleted_path.display());
            load_deleted(&deleted_path)?
        } else {
            tracing::warn!("{} missing, deleted table will be empty", DELNODES_FILE);
            Vec::new()
        };

        let merged_path = self.root.join(MERGED_FILE);
        let merged = if merged_path.exists() {
            tracing::info!("Processing {}", merged_path.display());
            load_merged(&merged_path)?
        } else {
            tracing::warn!("{} missing, merged table will be empty", MERGED_FILE);
            Vec::new()
        };

        Ok(Taxdump {
            records,
            deleted,
            merged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_split_fields() {
        let fields = split_fields("562\t|\t561\t|\tspecies\t|\tEC\t|\n");
        assert_eq!(fields, vec!["562", "561", "species", "EC"]);

        let fields = split_fields("12\t|\t74109\t|");
        assert_eq!(fields, vec!["12", "74109"]);
    }

    #[test]
    fn test_read_new_taxdump_layout() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            NODES_FILE,
            "1\t|\t1\t|\tno rank\t|\n2\t|\t1\t|\tsuperkingdom\t|\nbad\t|\t1\t|\tx\t|\n",
        );
        write(
            dir.path(),
            FULLNAMELINEAGE_FILE,
            "1\t|\troot\t|\t\t|\n2\t|\tBacteria\t|\tcellular organisms; \t|\n",
        );
        write(dir.path(), DELNODES_FILE, "3467805\t|\n");
        write(dir.path(), MERGED_FILE, "12\t|\t74109\t|\n");

        let dump = TaxdumpDir::new(dir.path()).read().unwrap();
        assert_eq!(dump.records.len(), 2);
        assert_eq!(dump.records[0], TaxonRecord::new(1u32, "root", Some("no rank"), 1u32));
        assert_eq!(dump.records[1].name, "Bacteria");
        assert_eq!(dump.deleted, vec![TaxonId(3467805)]);
        assert_eq!(dump.merged, vec![(TaxonId(12), TaxonId(74109))]);
    }

    #[test]
    fn test_read_classic_names_layout() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), NODES_FILE, "1\t|\t1\t|\tno rank\t|\n");
        write(
            dir.path(),
            NAMES_FILE,
            "1\t|\tall\t|\t\t|\tsynonym\t|\n1\t|\troot\t|\t\t|\tscientific name\t|\n",
        );

        let dump = TaxdumpDir::new(dir.path()).read().unwrap();
        assert_eq!(dump.records[0].name, "root");
        assert!(dump.deleted.is_empty());
        assert!(dump.merged.is_empty());
    }

    #[test]
    fn test_missing_nodes_file() {
        let dir = TempDir::new().unwrap();
        let err = TaxdumpDir::new(dir.path()).read().unwrap_err();
        assert!(matches!(err, TaxaError::NotFound(_)));
    }
}
