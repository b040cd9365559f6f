pub mod builder;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use builder::{build_database, IngestSummary};
pub use memory::InMemoryTaxonStore;
pub use sqlite::SqliteTaxonStore;
pub use traits::TaxonStore;
