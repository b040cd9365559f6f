/// Storage trait for the taxonomy tables
///
/// The engine only ever reads. An absent taxon is `Ok(None)` / `Ok(false)`;
/// `Err` is reserved for the backend itself failing.
use crate::bio::taxon_id::TaxonId;
use crate::bio::taxonomy::TaxonRecord;
use crate::Result;

/// Read-only lookups over current, deleted and merged taxa
pub trait TaxonStore: Send + Sync {
    /// Fetch the current record for a taxid
    fn fetch_record(&self, taxid: TaxonId) -> Result<Option<TaxonRecord>>;

    /// Fetch only the parent taxid
    fn fetch_parent_taxid(&self, taxid: TaxonId) -> Result<Option<TaxonId>> {
        Ok(self.fetch_record(taxid)?.map(|r| r.parent_taxid))
    }

    /// Is the taxid listed as withdrawn
    fn is_deleted(&self, taxid: TaxonId) -> Result<bool>;

    /// Current taxid an old taxid was folded into
    fn fetch_merged_target(&self, taxid: TaxonId) -> Result<Option<TaxonId>>;

    /// Number of current records
    fn taxa_count(&self) -> Result<usize>;
}

impl<S: TaxonStore + ?Sized> TaxonStore for Box<S> {
    fn fetch_record(&self, taxid: TaxonId) -> Result<Option<TaxonRecord>> {
        (**self).fetch_record(taxid)
    }

    fn fetch_parent_taxid(&self, taxid: TaxonId) -> Result<Option<TaxonId>> {
        (**self).fetch_parent_taxid(taxid)
    }

    fn is_deleted(&self, taxid: TaxonId) -> Result<bool> {
        (**self).is_deleted(taxid)
    }

    fn fetch_merged_target(&self, taxid: TaxonId) -> Result<Option<TaxonId>> {
        (**self).fetch_merged_target(taxid)
    }

    fn taxa_count(&self) -> Result<usize> {
        (**self).taxa_count()
    }
}
