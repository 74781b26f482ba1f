// file: src/extractor/mod.rs
// description: listing and email extraction module exports
// reference: internal module structure

pub mod entries;
pub mod patterns;

pub use entries::{Candidate, EntryExtractor, first_line};
pub use patterns::{DEFAULT_EMAIL_DOMAIN, EmailMatcher};
