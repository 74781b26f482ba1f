// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod entry;
pub mod row;

pub use entry::ListingEntry;
pub use row::OrgRow;
