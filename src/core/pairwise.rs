/// Common ancestors and distances between two taxa
use super::ancestry::AncestryWalker;
use crate::bio::taxon_id::{TaxidLike, TaxonId};
use crate::storage::TaxonStore;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Step counts between two taxa.
///
/// `left_levels_to_common_parent` is the number of steps the *right* taxid
/// climbs before landing in the left taxid's lineage, and
/// `right_levels_to_common_parent` the reverse. The two directions are
/// computed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelsBetween {
    pub left_levels_to_common_parent: u32,
    pub right_levels_to_common_parent: u32,
    pub total_levels_between_taxa: u32,
}

impl LevelsBetween {
    pub fn new(left: u32, right: u32) -> Self {
        Self {
            left_levels_to_common_parent: left,
            right_levels_to_common_parent: right,
            total_levels_between_taxa: left + right,
        }
    }
}

pub struct PairwiseResolver<'a, S> {
    walker: &'a AncestryWalker<S>,
}

impl<'a, S: TaxonStore> PairwiseResolver<'a, S> {
    pub fn new(walker: &'a AncestryWalker<S>) -> Self {
        Self { walker }
    }

    /// First taxon shared by both lineages.
    ///
    /// Materializes the left lineage and streams the right one upwards, so
    /// the result is not guaranteed to be symmetric in its arguments. An
    /// unknown left taxid (lineage of just itself, not the root) yields
    /// `None`.
    pub fn common_ancestor(
        &self,
        left: impl TaxidLike,
        right: impl TaxidLike,
    ) -> Result<Option<TaxonId>> {
        let (Some(left), Some(right)) = (left.to_taxon_id(), right.to_taxon_id()) else {
            return Ok(None);
        };

        let left_lineage = self.walker.closed_ancestors(left)?;
        if !left.is_root() && left_lineage.len() <= 1 {
            tracing::debug!("Taxid {} has no known lineage", left);
            return Ok(None);
        }

        Ok(self
            .walker
            .ascend_into(right, &left_lineage)?
            .map(|(ancestor, _)| ancestor))
    }

    pub fn levels_between(
        &self,
        left: impl TaxidLike,
        right: impl TaxidLike,
    ) -> Result<Option<LevelsBetween>> {
        let (Some(left), Some(right)) = (left.to_taxon_id(), right.to_taxon_id()) else {
            return Ok(None);
        };

        let left_lineage = self.walker.closed_ancestors(left)?;
        let Some((_, left_levels)) = self.walker.ascend_into(right, &left_lineage)? else {
            return Ok(None);
        };

        let right_lineage = self.walker.closed_ancestors(right)?;
        let Some((_, right_levels)) = self.walker.ascend_into(left, &right_lineage)? else {
            return Ok(None);
        };

        Ok(Some(LevelsBetween::new(left_levels, right_levels)))
    }
}
