// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

pub mod detail;
pub mod orchestrator;
pub mod pager;
mod progress;

pub use detail::{DetailFetcher, DetailOutcome};
pub use orchestrator::{RunSummary, ScrapeRun};
pub use pager::{Pager, PagerOutcome};
pub use progress::{ProgressTracker, RunStats};
