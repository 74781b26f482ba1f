// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod fetcher;
pub mod models;
pub mod page;
pub mod pipeline;
pub mod utils;

#[cfg(test)]
mod testing;

pub use config::{
    Backend, Config, DetailConfig, ExportConfig, PagerConfig, SelectorConfig, SourceConfig,
};
pub use error::{Result, ScraperError};
pub use exporter::CsvExporter;
pub use extractor::{Candidate, EmailMatcher, EntryExtractor};
pub use fetcher::{FetchResponse, Fetcher, HttpFetcher};
pub use models::{ListingEntry, OrgRow};
#[cfg(feature = "browser")]
pub use page::BrowserPage;
pub use page::{EntrySelectors, PageAccessor, StaticPage};
pub use pipeline::{
    DetailFetcher, DetailOutcome, Pager, PagerOutcome, ProgressTracker, RunStats, RunSummary,
    ScrapeRun,
};
pub use utils::{Stage, StageTimer, Validator};
