pub mod ncbi;

pub use ncbi::{
    extract_archive, find_dump_root, parse_listing, ArchiveKind, TaxdumpClient, TaxdumpListing,
    NEW_TAXDUMP_PAGE, TAXDUMP_ARCHIVE_PAGE,
};
