/// Membership predicates built on the closed ancestor set
use super::ancestry::AncestryWalker;
use super::tables::ClassificationTables;
use crate::bio::taxon_id::{TaxidLike, TaxonId};
use crate::storage::TaxonStore;
use crate::Result;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Superkingdom {
    Archaea,
    Bacteria,
    Eukaryota,
    Viruses,
}

impl Superkingdom {
    pub fn anchor(&self) -> TaxonId {
        match self {
            Self::Archaea => TaxonId::ARCHAEA,
            Self::Bacteria => TaxonId::BACTERIA,
            Self::Eukaryota => TaxonId::EUKARYOTA,
            Self::Viruses => TaxonId::VIRUSES,
        }
    }
}

/// Whether an old taxid was folded into a current one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeState {
    #[default]
    NotMerged,
    MergedInto(TaxonId),
}

/// Serialized as `false` or the new taxid
impl Serialize for MergeState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::NotMerged => serializer.serialize_bool(false),
            Self::MergedInto(id) => serializer.serialize_u32(id.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Current,
    Merged(TaxonId),
    /// Neither current nor merged: deleted, or never existed
    Retired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxidStatus {
    #[serde(rename = "isCurrent")]
    pub is_current: bool,
    #[serde(rename = "isDeleted")]
    pub is_deleted: bool,
    #[serde(rename = "isMerged")]
    pub merged: MergeState,
}

impl TaxidStatus {
    pub fn lifecycle(&self) -> Lifecycle {
        match (self.is_current, self.merged) {
            (true, _) => Lifecycle::Current,
            (false, MergeState::MergedInto(id)) => Lifecycle::Merged(id),
            (false, MergeState::NotMerged) => Lifecycle::Retired,
        }
    }
}

pub struct ClassificationEngine<'a, S> {
    walker: &'a AncestryWalker<S>,
    tables: &'a ClassificationTables,
}

impl<'a, S: TaxonStore> ClassificationEngine<'a, S> {
    pub fn new(walker: &'a AncestryWalker<S>, tables: &'a ClassificationTables) -> Self {
        Self { walker, tables }
    }

    pub fn is_in(&self, taxid: impl TaxidLike, superkingdom: Superkingdom) -> Result<bool> {
        let Some(id) = taxid.to_taxon_id() else {
            return Ok(false);
        };
        Ok(self
            .walker
            .closed_ancestors(id)?
            .contains(&superkingdom.anchor()))
    }

    pub fn is_archaea(&self, taxid: impl TaxidLike) -> Result<bool> {
        self.is_in(taxid, Superkingdom::Archaea)
    }

    pub fn is_bacteria(&self, taxid: impl TaxidLike) -> Result<bool> {
        self.is_in(taxid, Superkingdom::Bacteria)
    }

    pub fn is_eukaryote(&self, taxid: impl TaxidLike) -> Result<bool> {
        self.is_in(taxid, Superkingdom::Eukaryota)
    }

    pub fn is_virus(&self, taxid: impl TaxidLike) -> Result<bool> {
        self.is_in(taxid, Superkingdom::Viruses)
    }

    pub fn is_phage(&self, taxid: impl TaxidLike) -> Result<bool> {
        let Some(id) = taxid.to_taxon_id() else {
            return Ok(false);
        };
        let lineage = self.walker.closed_ancestors(id)?;
        Ok(lineage.iter().any(|t| self.tables.phages.contains_key(t)))
    }

    /// Baltimore label of a virus; the closest tagged ancestor wins
    pub fn baltimore_classification(&self, taxid: impl TaxidLike) -> Result<Option<String>> {
        self.closest_viral_label(taxid, &self.tables.baltimore)
    }

    /// Viral realm, resolved the same way as the Baltimore label
    pub fn viral_realm(&self, taxid: impl TaxidLike) -> Result<Option<String>> {
        self.closest_viral_label(taxid, &self.tables.viral_realms)
    }

    fn closest_viral_label(
        &self,
        taxid: impl TaxidLike,
        table: &IndexMap<TaxonId, String>,
    ) -> Result<Option<String>> {
        let Some(id) = taxid.to_taxon_id() else {
            return Ok(None);
        };
        let lineage = self.walker.closed_ancestors(id)?;
        if !lineage.contains(&TaxonId::VIRUSES) {
            return Ok(None);
        }
        Ok(lineage.iter().find_map(|t| table.get(t).cloned()))
    }

    pub fn status(&self, taxid: impl TaxidLike) -> Result<TaxidStatus> {
        let Some(id) = taxid.to_taxon_id() else {
            return Ok(TaxidStatus {
                is_current: false,
                is_deleted: false,
                merged: MergeState::NotMerged,
            });
        };
        let store = self.walker.store();

        Ok(TaxidStatus {
            is_current: store.fetch_record(id)?.is_some(),
            is_deleted: store.is_deleted(id)?,
            merged: store
                .fetch_merged_target(id)?
                .map_or(MergeState::NotMerged, MergeState::MergedInto),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryTaxonStore;
    use pretty_assertions::assert_eq;

    fn store() -> InMemoryTaxonStore {
        InMemoryTaxonStore::new()
            .with_taxon(1, "root", Some("no rank"), 1)
            .with_taxon(131567, "cellular organisms", Some("no rank"), 1)
            .with_taxon(2, "Bacteria", Some("superkingdom"), 131567)
            .with_taxon(2157, "Archaea", Some("superkingdom"), 131567)
            .with_taxon(2173, "Methanobrevibacter smithii", Some("species"), 2157)
            .with_taxon(562, "Escherichia coli", Some("species"), 2)
            .with_taxon(10239, "Viruses", Some("superkingdom"), 1)
            .with_taxon(2731341, "Duplodnaviria", Some("realm"), 10239)
            .with_taxon(2731619, "Caudoviricetes", Some("class"), 2731341)
            .with_taxon(2560487, "Bowservirus bowser", Some("species"), 2731619)
            .with_taxon(700001, "untagged virus", Some("species"), 10239)
            .with_deleted(3467805)
            .with_merged(12, 562)
    }

    fn tables() -> ClassificationTables {
        let mut tables = ClassificationTables::empty();
        tables.phages.insert(TaxonId(2731619), "Caudoviricetes".to_string());
        tables.baltimore.insert(TaxonId(2731341), "dsDNA".to_string());
        tables.baltimore.insert(TaxonId(2731619), "dsDNA (tailed)".to_string());
        tables.viral_realms.insert(TaxonId(2731341), "Duplodnaviria".to_string());
        // a non-viral taxon in the Baltimore table must never be reported
        tables.baltimore.insert(TaxonId(562), "bogus".to_string());
        tables
    }

    #[test]
    fn test_superkingdom_membership() {
        let walker = AncestryWalker::new(store());
        let tables = tables();
        let engine = ClassificationEngine::new(&walker, &tables);

        assert!(engine.is_archaea(2173u32).unwrap());
        assert!(!engine.is_archaea(562u32).unwrap());
        assert!(engine.is_bacteria("562").unwrap());
        assert!(!engine.is_eukaryote(562u32).unwrap());
        assert!(engine.is_virus(2560487u32).unwrap());
        assert!(engine.is_archaea(2157u32).unwrap());
        assert!(!engine.is_virus(424242u32).unwrap());
    }

    #[test]
    fn test_phage_membership() {
        let walker = AncestryWalker::new(store());
        let tables = tables();
        let engine = ClassificationEngine::new(&walker, &tables);

        assert!(engine.is_phage(2731619u32).unwrap());
        assert!(engine.is_phage(2560487u32).unwrap());
        assert!(!engine.is_phage(2731341u32).unwrap());
        assert!(!engine.is_phage(562u32).unwrap());
    }

    #[test]
    fn test_baltimore_prefers_closest_ancestor() {
        let walker = AncestryWalker::new(store());
        let tables = tables();
        let engine = ClassificationEngine::new(&walker, &tables);

        assert_eq!(
            engine.baltimore_classification(2560487u32).unwrap().as_deref(),
            Some("dsDNA (tailed)")
        );
        assert_eq!(
            engine.baltimore_classification(2731341u32).unwrap().as_deref(),
            Some("dsDNA")
        );
        assert_eq!(engine.baltimore_classification(700001u32).unwrap(), None);
    }

    #[test]
    fn test_baltimore_requires_virus() {
        let walker = AncestryWalker::new(store());
        let tables = tables();
        let engine = ClassificationEngine::new(&walker, &tables);

        assert!(!engine.is_virus(562u32).unwrap());
        assert_eq!(engine.baltimore_classification(562u32).unwrap(), None);
        assert_eq!(engine.viral_realm(562u32).unwrap(), None);
        assert_eq!(
            engine.viral_realm(2560487u32).unwrap().as_deref(),
            Some("Duplodnaviria")
        );
    }

    #[test]
    fn test_status() {
        let walker = AncestryWalker::new(store());
        let tables = tables();
        let engine = ClassificationEngine::new(&walker, &tables);

        let current = engine.status(2u32).unwrap();
        assert_eq!(
            current,
            TaxidStatus { is_current: true, is_deleted: false, merged: MergeState::NotMerged }
        );
        assert_eq!(current.lifecycle(), Lifecycle::Current);

        let deleted = engine.status(3467805u32).unwrap();
        assert_eq!(
            deleted,
            TaxidStatus { is_current: false, is_deleted: true, merged: MergeState::NotMerged }
        );
        assert_eq!(deleted.lifecycle(), Lifecycle::Retired);

        let merged = engine.status("12").unwrap();
        assert_eq!(merged.merged, MergeState::MergedInto(TaxonId(562)));
        assert_eq!(merged.lifecycle(), Lifecycle::Merged(TaxonId(562)));
    }

    #[test]
    fn test_status_legacy_json_shape() {
        let status = TaxidStatus {
            is_current: false,
            is_deleted: false,
            merged: MergeState::MergedInto(TaxonId(74109)),
        };
        assert_eq!(
            serde_json::to_value(status).unwrap(),
            serde_json::json!({"isCurrent": false, "isDeleted": false, "isMerged": 74109})
        );

        let status = TaxidStatus {
            is_current: true,
            is_deleted: false,
            merged: MergeState::NotMerged,
        };
        assert_eq!(
            serde_json::to_value(status).unwrap(),
            serde_json::json!({"isCurrent": true, "isDeleted": false, "isMerged": false})
        );
    }
}
