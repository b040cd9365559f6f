/// Taxonomy records and ranks as stored in the taxa table
use super::taxon_id::TaxonId;
use serde::{Deserialize, Serialize};

/// Ranks the engine ascends to by name.
///
/// NCBI ranks are free text; anything not listed here is still stored
/// verbatim on the record and compared as a plain string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomicRank {
    Superkingdom,
    Genus,
    Species,
}

impl TaxonomicRank {
    /// Rank label exactly as it appears in nodes.dmp
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Superkingdom => "superkingdom",
            Self::Genus => "genus",
            Self::Species => "species",
        }
    }
}

impl std::fmt::Display for TaxonomicRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The label NCBI uses for nodes that carry no formal rank
pub const NO_RANK: &str = "no rank";

/// One row of the taxa table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonRecord {
    pub taxid: TaxonId,
    pub name: String,
    /// `None` (or an empty string from older dumps) means the rank is
    /// unknown, which is not the same thing as `"no rank"`.
    pub rank: Option<String>,
    pub parent_taxid: TaxonId,
}

impl TaxonRecord {
    pub fn new(
        taxid: impl Into<TaxonId>,
        name: impl Into<String>,
        rank: Option<&str>,
        parent_taxid: impl Into<TaxonId>,
    ) -> Self {
        Self {
            taxid: taxid.into(),
            name: name.into(),
            rank: rank.map(str::to_string),
            parent_taxid: parent_taxid.into(),
        }
    }

    /// Rank label if the record has a non-empty one
    pub fn rank_label(&self) -> Option<&str> {
        self.rank.as_deref().filter(|r| !r.is_empty())
    }

    pub fn has_rank(&self, rank: &str) -> bool {
        self.rank_label() == Some(rank)
    }
}
