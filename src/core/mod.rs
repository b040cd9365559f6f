pub mod ancestry;
pub mod classification;
pub mod config;
pub mod engine;
pub mod graph;
pub mod pairwise;
pub mod paths;
pub mod tables;

pub use ancestry::AncestryWalker;
pub use classification::{ClassificationEngine, Lifecycle, MergeState, Superkingdom, TaxidStatus};
pub use config::Config;
pub use engine::TaxonomyEngine;
pub use graph::LineageGraph;
pub use pairwise::{LevelsBetween, PairwiseResolver};
pub use tables::ClassificationTables;
