/// Taxid newtype and input normalization
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// NCBI taxonomy identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxonId(pub u32);

impl TaxonId {
    pub fn value(&self) -> u32 {
        self.0
    }

    /// The root (taxid 1) is its own parent
    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }
}

// Fixed anchors of the NCBI tree
impl TaxonId {
    pub const ROOT: Self = Self(1);
    pub const BACTERIA: Self = Self(2);
    pub const ARCHAEA: Self = Self(2157);
    pub const EUKARYOTA: Self = Self(2759);
    pub const VIRUSES: Self = Self(10239);
}

impl fmt::Display for TaxonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TaxonId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<TaxonId> for u32 {
    fn from(taxon: TaxonId) -> Self {
        taxon.0
    }
}

impl FromStr for TaxonId {
    type Err = crate::TaxaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(TaxonId)
            .map_err(|e| crate::TaxaError::Parse(format!("invalid taxid '{}': {}", s, e)))
    }
}

/// Anything the engine accepts as a taxid.
///
/// Integers and integer-formatted strings name the same taxon. Values that
/// cannot be a taxid (negative numbers, non-numeric text) normalize to
/// `None` and are then treated as unknown taxa.
pub trait TaxidLike {
    fn to_taxon_id(&self) -> Option<TaxonId>;
}

impl TaxidLike for TaxonId {
    fn to_taxon_id(&self) -> Option<TaxonId> {
        Some(*self)
    }
}

impl TaxidLike for u32 {
    fn to_taxon_id(&self) -> Option<TaxonId> {
        Some(TaxonId(*self))
    }
}

macro_rules! impl_taxid_like_for_int {
    ($($t:ty),*) => {
        $(
            impl TaxidLike for $t {
                fn to_taxon_id(&self) -> Option<TaxonId> {
                    u32::try_from(*self).ok().map(TaxonId)
                }
            }
        )*
    };
}

impl_taxid_like_for_int!(i32, i64, u64, usize);

impl TaxidLike for str {
    fn to_taxon_id(&self) -> Option<TaxonId> {
        match self.parse::<TaxonId>() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::debug!("{}", e);
                None
            }
        }
    }
}

impl TaxidLike for String {
    fn to_taxon_id(&self) -> Option<TaxonId> {
        self.as_str().to_taxon_id()
    }
}

impl<T: TaxidLike + ?Sized> TaxidLike for &T {
    fn to_taxon_id(&self) -> Option<TaxonId> {
        (**self).to_taxon_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_and_string_are_equivalent() {
        assert_eq!(562u32.to_taxon_id(), "562".to_taxon_id());
        assert_eq!(562i64.to_taxon_id(), Some(TaxonId(562)));
        assert_eq!(String::from(" 562 ").to_taxon_id(), Some(TaxonId(562)));
    }

    #[test]
    fn test_invalid_inputs_normalize_to_none() {
        assert_eq!((-5i64).to_taxon_id(), None);
        assert_eq!("E. coli".to_taxon_id(), None);
        assert_eq!("".to_taxon_id(), None);
        assert_eq!(u64::MAX.to_taxon_id(), None);
    }

    #[test]
    fn test_root() {
        assert!(TaxonId::ROOT.is_root());
        assert!(!TaxonId::BACTERIA.is_root());
        assert_eq!(TaxonId::ROOT.to_string(), "1");
    }

    #[test]
    fn test_serializes_as_integer() {
        let json = serde_json::to_string(&TaxonId(9606)).unwrap();
        assert_eq!(json, "9606");
    }
}
