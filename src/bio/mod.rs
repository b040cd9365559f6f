pub mod taxdump;
pub mod taxon_id;
pub mod taxonomy;
