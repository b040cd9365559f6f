/// Query facade over a taxon store
///
/// Owns the store handle, the ancestry walker (and with it the species memo)
/// and the classification tables. Cheap per-call views
/// ([`PairwiseResolver`], [`ClassificationEngine`]) are built on demand.
use super::ancestry::AncestryWalker;
use super::classification::{ClassificationEngine, TaxidStatus};
use super::graph::LineageGraph;
use super::pairwise::{LevelsBetween, PairwiseResolver};
use super::tables::ClassificationTables;
use crate::bio::taxon_id::{TaxidLike, TaxonId};
use crate::bio::taxonomy::TaxonRecord;
use crate::storage::{SqliteTaxonStore, TaxonStore};
use crate::Result;
use std::path::Path;

pub struct TaxonomyEngine<S = SqliteTaxonStore> {
    walker: AncestryWalker<S>,
    tables: ClassificationTables,
}

impl TaxonomyEngine<SqliteTaxonStore> {
    /// Open the SQLite store at `db_path` with the given tables
    pub fn open(db_path: impl AsRef<Path>, tables: ClassificationTables) -> Result<Self> {
        let store = SqliteTaxonStore::open(db_path)?;
        Ok(Self::new(store, tables))
    }
}

impl<S: TaxonStore> TaxonomyEngine<S> {
    pub fn new(store: S, tables: ClassificationTables) -> Self {
        Self {
            walker: AncestryWalker::new(store),
            tables,
        }
    }

    pub fn walker(&self) -> &AncestryWalker<S> {
        &self.walker
    }

    pub fn tables(&self) -> &ClassificationTables {
        &self.tables
    }

    pub fn pairwise(&self) -> PairwiseResolver<'_, S> {
        PairwiseResolver::new(&self.walker)
    }

    pub fn classification(&self) -> ClassificationEngine<'_, S> {
        ClassificationEngine::new(&self.walker, &self.tables)
    }

    // Records and single steps

    pub fn record(&self, taxid: impl TaxidLike) -> Result<Option<TaxonRecord>> {
        self.walker.record(taxid)
    }

    pub fn parent_taxid(&self, taxid: impl TaxidLike) -> Result<Option<TaxonId>> {
        self.walker.parent_of(taxid)
    }

    pub fn parent_record(&self, taxid: impl TaxidLike) -> Result<Option<TaxonRecord>> {
        match self.walker.parent_of(taxid)? {
            Some(parent) => self.walker.record(parent),
            None => Ok(None),
        }
    }

    // Lineage

    pub fn all_parent_taxids(
        &self,
        taxid: impl TaxidLike,
        include_self: bool,
    ) -> Result<Vec<TaxonId>> {
        self.walker.all_ancestors(taxid, include_self)
    }

    pub fn genus_taxid(&self, taxid: impl TaxidLike) -> Result<Option<TaxonId>> {
        self.walker.genus_of(taxid)
    }

    pub fn species_taxid(&self, taxid: impl TaxidLike) -> Result<Option<TaxonId>> {
        self.walker.species_of(taxid)
    }

    pub fn superkingdom_taxid(&self, taxid: impl TaxidLike) -> Result<Option<TaxonId>> {
        self.walker.superkingdom_of(taxid)
    }

    // Pairs

    pub fn common_parent_taxid(
        &self,
        left: impl TaxidLike,
        right: impl TaxidLike,
    ) -> Result<Option<TaxonId>> {
        self.pairwise().common_ancestor(left, right)
    }

    pub fn common_parent_record(
        &self,
        left: impl TaxidLike,
        right: impl TaxidLike,
    ) -> Result<Option<TaxonRecord>> {
        match self.common_parent_taxid(left, right)? {
            Some(ancestor) => self.walker.record(ancestor),
            None => Ok(None),
        }
    }

    pub fn levels_between(
        &self,
        left: impl TaxidLike,
        right: impl TaxidLike,
    ) -> Result<Option<LevelsBetween>> {
        self.pairwise().levels_between(left, right)
    }

    // Classification

    pub fn is_archaea(&self, taxid: impl TaxidLike) -> Result<bool> {
        self.classification().is_archaea(taxid)
    }

    pub fn is_bacteria(&self, taxid: impl TaxidLike) -> Result<bool> {
        self.classification().is_bacteria(taxid)
    }

    pub fn is_eukaryote(&self, taxid: impl TaxidLike) -> Result<bool> {
        self.classification().is_eukaryote(taxid)
    }

    pub fn is_virus(&self, taxid: impl TaxidLike) -> Result<bool> {
        self.classification().is_virus(taxid)
    }

    pub fn is_phage(&self, taxid: impl TaxidLike) -> Result<bool> {
        self.classification().is_phage(taxid)
    }

    pub fn baltimore_classification(&self, taxid: impl TaxidLike) -> Result<Option<String>> {
        self.classification().baltimore_classification(taxid)
    }

    pub fn viral_realm(&self, taxid: impl TaxidLike) -> Result<Option<String>> {
        self.classification().viral_realm(taxid)
    }

    pub fn status(&self, taxid: impl TaxidLike) -> Result<TaxidStatus> {
        self.classification().status(taxid)
    }

    /// Lineage graph of every given taxon; unknown taxa are skipped
    pub fn lineage_graph<T: TaxidLike>(&self, taxids: &[T]) -> Result<LineageGraph> {
        let mut graph = LineageGraph::new();

        for taxid in taxids {
            let Some(id) = taxid.to_taxon_id() else {
                continue;
            };
            let mut records = Vec::new();
            for ancestor in self.walker.all_ancestors(id, true)? {
                match self.walker.record(ancestor)? {
                    Some(record) => records.push(record),
                    None => tracing::warn!("No record for taxid {} in lineage of {}", ancestor, id),
                }
            }
            if records.is_empty() {
                tracing::warn!("Taxid {} not found, leaving it out of the graph", id);
                continue;
            }
            graph.add_lineage(&records);
        }

        Ok(graph)
    }
}
