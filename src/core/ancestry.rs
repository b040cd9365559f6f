/// Upward traversal of the taxonomy tree
///
/// Every ascent stops at the root (taxid 1) before issuing another lookup:
/// the root is stored as its own parent, so following the link from there
/// would never terminate. Walks are also capped at [`MAX_LINEAGE_DEPTH`]
/// steps so a corrupt store cannot hang a query.
use crate::bio::taxon_id::{TaxidLike, TaxonId};
use crate::bio::taxonomy::{TaxonRecord, TaxonomicRank};
use crate::storage::TaxonStore;
use crate::Result;
use dashmap::DashMap;
use indexmap::IndexSet;

/// Real NCBI lineages are under 50 levels deep
pub const MAX_LINEAGE_DEPTH: usize = 256;

pub struct AncestryWalker<S> {
    store: S,
    species_cache: DashMap<TaxonId, Option<TaxonId>>,
}

impl<S: TaxonStore> AncestryWalker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            species_cache: DashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn record(&self, taxid: impl TaxidLike) -> Result<Option<TaxonRecord>> {
        match taxid.to_taxon_id() {
            Some(id) => self.store.fetch_record(id),
            None => Ok(None),
        }
    }

    /// Single step up. The root is its own parent.
    pub fn parent_of(&self, taxid: impl TaxidLike) -> Result<Option<TaxonId>> {
        match taxid.to_taxon_id() {
            Some(id) => self.step_up(id),
            None => Ok(None),
        }
    }

    fn step_up(&self, id: TaxonId) -> Result<Option<TaxonId>> {
        if id.is_root() {
            return Ok(Some(TaxonId::ROOT));
        }
        self.store.fetch_parent_taxid(id)
    }

    /// Ancestors from most to least specific, root last.
    ///
    /// An unknown taxid somewhere along the chain ends the walk early and the
    /// partial lineage is returned. A cycle, or a chain that does not reach
    /// the root within [`MAX_LINEAGE_DEPTH`] steps, is a failed lookup and
    /// yields the same result as an unknown taxid.
    pub fn all_ancestors(&self, taxid: impl TaxidLike, include_self: bool) -> Result<Vec<TaxonId>> {
        let Some(id) = taxid.to_taxon_id() else {
            return Ok(Vec::new());
        };
        Ok(self.lineage(id, include_self)?.into_iter().collect())
    }

    /// Closed ancestor set in lineage order (self first, root last)
    pub fn closed_ancestors(&self, id: TaxonId) -> Result<IndexSet<TaxonId>> {
        self.lineage(id, true)
    }

    fn lineage(&self, id: TaxonId, include_self: bool) -> Result<IndexSet<TaxonId>> {
        let mut lineage = IndexSet::new();
        if include_self {
            lineage.insert(id);
        }

        let mut current = id;
        for _ in 0..MAX_LINEAGE_DEPTH {
            if current.is_root() {
                return Ok(lineage);
            }
            match self.store.fetch_parent_taxid(current)? {
                Some(parent) => {
                    if parent == id || !lineage.insert(parent) {
                        tracing::warn!("Cycle at taxid {} while walking up from {}", parent, id);
                        return Ok(Self::failed_lineage(id, include_self));
                    }
                    current = parent;
                }
                None => {
                    tracing::debug!("Lineage of {} stops at unknown taxid {}", id, current);
                    return Ok(lineage);
                }
            }
        }

        if current.is_root() {
            return Ok(lineage);
        }

        tracing::warn!(
            "Lineage of {} exceeded {} levels without reaching the root",
            id,
            MAX_LINEAGE_DEPTH
        );
        Ok(Self::failed_lineage(id, include_self))
    }

    fn failed_lineage(id: TaxonId, include_self: bool) -> IndexSet<TaxonId> {
        if include_self {
            IndexSet::from([id])
        } else {
            IndexSet::new()
        }
    }

    /// Walk up from `start` until landing on a member of `targets`.
    ///
    /// Returns the member reached and the number of steps taken, or `None`
    /// if the walk runs off the known tree or passes the root.
    pub fn ascend_into(
        &self,
        start: TaxonId,
        targets: &IndexSet<TaxonId>,
    ) -> Result<Option<(TaxonId, u32)>> {
        let mut current = start;
        let mut steps = 0u32;

        for _ in 0..=MAX_LINEAGE_DEPTH {
            if targets.contains(&current) {
                return Ok(Some((current, steps)));
            }
            if current.is_root() {
                return Ok(None);
            }
            match self.store.fetch_parent_taxid(current)? {
                Some(parent) => {
                    current = parent;
                    steps += 1;
                }
                None => return Ok(None),
            }
        }

        tracing::warn!(
            "Ascent from {} exceeded {} levels without a match",
            start,
            MAX_LINEAGE_DEPTH
        );
        Ok(None)
    }

    /// First taxon at or above `taxid` whose rank is `target_rank`.
    ///
    /// A record with an empty rank ends the search before the root check.
    pub fn ascend_to_rank(
        &self,
        taxid: impl TaxidLike,
        target_rank: &str,
    ) -> Result<Option<TaxonId>> {
        match taxid.to_taxon_id() {
            Some(id) => self.rank_walk(id, target_rank, None),
            None => Ok(None),
        }
    }

    fn rank_walk(
        &self,
        id: TaxonId,
        target_rank: &str,
        memo: Option<&DashMap<TaxonId, Option<TaxonId>>>,
    ) -> Result<Option<TaxonId>> {
        let mut visited = Vec::new();
        let mut current = id;

        let found = 'walk: {
            for _ in 0..=MAX_LINEAGE_DEPTH {
                if let Some(hit) = memo.and_then(|m| m.get(&current).map(|v| *v)) {
                    break 'walk hit;
                }
                visited.push(current);

                let Some(record) = self.store.fetch_record(current)? else {
                    break 'walk None;
                };
                if record.has_rank(target_rank) {
                    break 'walk Some(current);
                }
                if record.rank_label().is_none() {
                    break 'walk None;
                }
                if current.is_root() {
                    break 'walk None;
                }
                current = record.parent_taxid;
            }

            tracing::warn!(
                "No {} found within {} levels of {}",
                target_rank,
                MAX_LINEAGE_DEPTH,
                id
            );
            None
        };

        if let Some(memo) = memo {
            for taxid in visited {
                memo.insert(taxid, found);
            }
        }

        Ok(found)
    }

    pub fn genus_of(&self, taxid: impl TaxidLike) -> Result<Option<TaxonId>> {
        self.ascend_to_rank(taxid, TaxonomicRank::Genus.as_str())
    }

    /// Memoized for the lifetime of the walker
    pub fn species_of(&self, taxid: impl TaxidLike) -> Result<Option<TaxonId>> {
        let Some(id) = taxid.to_taxon_id() else {
            return Ok(None);
        };
        if let Some(hit) = self.species_cache.get(&id).map(|v| *v) {
            return Ok(hit);
        }
        self.rank_walk(id, TaxonomicRank::Species.as_str(), Some(&self.species_cache))
    }

    pub fn superkingdom_of(&self, taxid: impl TaxidLike) -> Result<Option<TaxonId>> {
        self.ascend_to_rank(taxid, TaxonomicRank::Superkingdom.as_str())
    }

    /// Forget memoized species lookups, e.g. after the store was rebuilt
    pub fn clear_species_cache(&self) {
        self.species_cache.clear();
    }

    pub fn species_cache_len(&self) -> usize {
        self.species_cache.len()
    }
}
