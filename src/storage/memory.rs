/// HashMap-backed taxon store
use super::traits::TaxonStore;
use crate::bio::taxon_id::TaxonId;
use crate::bio::taxonomy::TaxonRecord;
use crate::Result;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default, Clone)]
pub struct InMemoryTaxonStore {
    taxa: HashMap<TaxonId, TaxonRecord>,
    deleted: HashSet<TaxonId>,
    merged: HashMap<TaxonId, TaxonId>,
}

impl InMemoryTaxonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_taxon(&mut self, record: TaxonRecord) {
        self.taxa.insert(record.taxid, record);
    }

    /// Builder-style insert, for assembling small trees
    pub fn with_taxon(
        mut self,
        taxid: u32,
        name: &str,
        rank: Option<&str>,
        parent: u32,
    ) -> Self {
        self.add_taxon(TaxonRecord::new(taxid, name, rank, parent));
        self
    }

    pub fn with_deleted(mut self, taxid: u32) -> Self {
        self.deleted.insert(TaxonId(taxid));
        self
    }

    pub fn with_merged(mut self, old: u32, new: u32) -> Self {
        self.merged.insert(TaxonId(old), TaxonId(new));
        self
    }
}

impl TaxonStore for InMemoryTaxonStore {
    fn fetch_record(&self, taxid: TaxonId) -> Result<Option<TaxonRecord>> {
        Ok(self.taxa.get(&taxid).cloned())
    }

    fn fetch_parent_taxid(&self, taxid: TaxonId) -> Result<Option<TaxonId>> {
        Ok(self.taxa.get(&taxid).map(|r| r.parent_taxid))
    }

    fn is_deleted(&self, taxid: TaxonId) -> Result<bool> {
        Ok(self.deleted.contains(&taxid))
    }

    fn fetch_merged_target(&self, taxid: TaxonId) -> Result<Option<TaxonId>> {
        Ok(self.merged.get(&taxid).copied())
    }

    fn taxa_count(&self) -> Result<usize> {
        Ok(self.taxa.len())
    }
}
