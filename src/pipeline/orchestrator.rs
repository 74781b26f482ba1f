// file: src/pipeline/orchestrator.rs
// description: drives pager, extractor, detail fetcher and exporter in sequence
// reference: one linear run, every await sequential

use crate::config::Config;
use crate::error::Result;
use crate::exporter::CsvExporter;
use crate::extractor::{EmailMatcher, EntryExtractor};
use crate::fetcher::Fetcher;
use crate::models::OrgRow;
use crate::page::{EntrySelectors, PageAccessor};
use crate::pipeline::detail::DetailFetcher;
use crate::pipeline::pager::Pager;
use crate::pipeline::progress::{ProgressTracker, RunStats};
use crate::utils::logging::format_email_result;
use crate::utils::{Stage, StageTimer, Validator};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// Detail lookups slower than this are called out in the log.
const SLOW_LOOKUP: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output: PathBuf,
    pub rows: usize,
    pub stats: RunStats,
    pub finished_at: DateTime<Utc>,
}

pub struct ScrapeRun {
    pager: Pager,
    extractor: EntryExtractor,
    selectors: EntrySelectors,
    matcher: EmailMatcher,
    exporter: CsvExporter,
    output_dir: PathBuf,
    show_progress: bool,
    colored: bool,
}

impl ScrapeRun {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            pager: Pager::from_config(config),
            extractor: EntryExtractor::new(
                config.selectors.results.clone(),
                config.export.include_description,
            ),
            selectors: EntrySelectors::from(&config.selectors),
            matcher: EmailMatcher::new(&config.detail.email_domain)?,
            exporter: CsvExporter::new(config.export.include_description)
                .with_file_name(config.export.file_name.clone()),
            output_dir: config.export.output_dir.clone(),
            show_progress: true,
            colored: true,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    fn progress_tracker(&self, entries: usize) -> ProgressTracker {
        if self.show_progress {
            ProgressTracker::with_color(entries, self.colored)
        } else {
            ProgressTracker::hidden(entries)
        }
    }

    /// Pager, extractor and detail fetcher. Rows come back in discovery order.
    pub async fn collect<P>(
        &self,
        page: &mut P,
        fetcher: &dyn Fetcher,
    ) -> Result<(Vec<OrgRow>, RunStats)>
    where
        P: PageAccessor + ?Sized,
    {
        let started = Instant::now();

        let timer = StageTimer::start(Stage::Pager);
        let paging = self.pager.expand(page).await?;
        timer.finish();

        let timer = StageTimer::start(Stage::Extractor);
        let entries = page.entries(&self.selectors).await?;
        let candidates = self.extractor.extract(entries)?;
        timer.finish_with_count(candidates.len());

        let origin = page.origin().await?;
        let detail = DetailFetcher::new(fetcher, self.matcher.clone());
        let progress = self.progress_tracker(candidates.len());

        let timer = StageTimer::start(Stage::DetailFetcher);
        let mut rows = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            info!(
                "Fetching email for {} → {}",
                Validator::truncate_text(&candidate.name, 80),
                candidate.href
            );
            progress.start_lookup(&candidate.name);

            let lookup = StageTimer::start(Stage::DetailFetcher);
            let outcome = detail.lookup(&origin, &candidate.href).await;
            lookup.warn_if_slow(SLOW_LOOKUP, &candidate.href);

            progress.record(&outcome);
            info!("{}", format_email_result(&candidate.name, outcome.email()));

            rows.push(OrgRow {
                name: candidate.name,
                email: outcome.into_email(),
                description: candidate.description,
            });
        }
        timer.finish_with_count(rows.len());
        progress.finish();

        let mut stats = progress.get_stats();
        stats.activations = paging.activations;
        stats.pagination_capped = paging.capped;
        stats.duration = started.elapsed();

        Ok((rows, stats))
    }

    /// Full run. Nothing is written unless every stage before the exporter succeeded.
    pub async fn run<P>(&self, page: &mut P, fetcher: &dyn Fetcher) -> Result<RunSummary>
    where
        P: PageAccessor + ?Sized,
    {
        let (rows, stats) = self.collect(page, fetcher).await?;

        let timer = StageTimer::start(Stage::Exporter);
        let output = self.exporter.export(&rows, &self.output_dir)?;
        timer.finish();

        log_final_stats(&stats);
        info!("Done. CSV with {} rows written to {}", rows.len(), output.display());

        Ok(RunSummary {
            output,
            rows: rows.len(),
            stats,
            finished_at: Utc::now(),
        })
    }
}

fn log_final_stats(stats: &RunStats) {
    info!("=== Scrape Summary ===");
    info!("Duration: {:.2} seconds", stats.duration.as_secs_f64());
    info!("Load-more activations: {}", stats.activations);
    if stats.pagination_capped {
        info!("Pagination stopped at the activation cap");
    }
    info!("Organizations: {}", stats.entries);
    info!("Emails found: {}", stats.emails_found);
    info!("No email on page: {}", stats.no_match);
    info!("HTTP failures: {}", stats.http_failures);
    info!("Fetch errors: {}", stats.errors);
    info!("Hit rate: {:.2}%", stats.hit_rate());
    info!("Lookup speed: {:.2} pages/sec", stats.lookups_per_second());
    info!("======================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScraperError;
    use crate::models::ListingEntry;
    use crate::testing::{FakeFetcher, FakePage};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const ORIGIN: &str = "https://huskylink.washington.edu";

    fn config(include_description: bool, output_dir: &TempDir) -> Config {
        let mut config = Config::default_config();
        config.pager.delay_ms = 0;
        config.export.include_description = include_description;
        config.export.output_dir = output_dir.path().to_path_buf();
        config
    }

    fn listing() -> FakePage {
        FakePage::new(ORIGIN)
            .with_load_more(2)
            .entry(
                ListingEntry::new("/organization/a", "Alpha Club\nA tech club.")
                    .with_excerpt("A tech club."),
            )
            .entry(
                ListingEntry::new("/organization/b", "Beta League\nA policy league.")
                    .with_excerpt("A policy league."),
            )
    }

    fn detail_pages() -> FakeFetcher {
        FakeFetcher::new()
            .page("/organization/a", 200, "<p>contact: foo@uw.edu</p>")
            .page("/organization/b", 404, "")
    }

    #[tokio::test]
    async fn test_two_column_end_to_end() {
        let dir = TempDir::new().unwrap();
        let run = ScrapeRun::new(&config(false, &dir)).unwrap().with_progress(false);
        let mut page = listing();
        let fetcher = detail_pages();

        let summary = run.run(&mut page, &fetcher).await.unwrap();

        assert_eq!(summary.output, dir.path().join("rso_emails.csv"));
        assert_eq!(
            fs::read_to_string(&summary.output).unwrap(),
            "Organization Name,Email Address\n\"Alpha Club\",\"foo@uw.edu\"\n\"Beta League\",\"\"\n"
        );
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.stats.activations, 2);
        assert_eq!(summary.stats.emails_found, 1);
        assert_eq!(summary.stats.http_failures, 1);
    }

    #[tokio::test]
    async fn test_three_column_end_to_end() {
        let dir = TempDir::new().unwrap();
        let run = ScrapeRun::new(&config(true, &dir)).unwrap().with_progress(false);
        let mut page = listing();
        let fetcher = detail_pages();

        let summary = run.run(&mut page, &fetcher).await.unwrap();

        assert_eq!(
            summary.output,
            dir.path().join("rso_emails_and_descriptions.csv")
        );
        assert_eq!(
            fs::read_to_string(&summary.output).unwrap(),
            "Organization Name,Email Address,Description\n\
             \"Alpha Club\",\"foo@uw.edu\",\"A tech club.\"\n\
             \"Beta League\",\"\",\"A policy league.\"\n"
        );
    }

    #[tokio::test]
    async fn test_row_count_matches_entry_count() {
        let dir = TempDir::new().unwrap();
        let run = ScrapeRun::new(&config(false, &dir)).unwrap().with_progress(false);
        let mut page = FakePage::new(ORIGIN);
        for i in 0..25 {
            page = page.entry(ListingEntry::new(
                format!("/organization/club-{}", i % 7),
                format!("Club {}", i % 7),
            ));
        }
        let fetcher = FakeFetcher::new().page("/organization/club-3", 200, "x3@uw.edu");

        let (rows, stats) = run.collect(&mut page, &fetcher).await.unwrap();

        assert_eq!(rows.len(), 25);
        assert_eq!(stats.entries, 25);
        assert_eq!(stats.lookups(), 25);
        assert_eq!(rows.iter().filter(|r| r.has_email()).count(), 4);
        assert_eq!(rows[3].email, "x3@uw.edu");
        assert_eq!(rows[24].name, "Club 3");
    }

    #[tokio::test]
    async fn test_lookups_are_sequential_in_document_order() {
        let dir = TempDir::new().unwrap();
        let run = ScrapeRun::new(&config(false, &dir)).unwrap().with_progress(false);
        let mut page = listing();
        let fetcher = detail_pages();

        run.collect(&mut page, &fetcher).await.unwrap();

        assert_eq!(
            fetcher.requests(),
            vec![
                format!("{}/organization/a", ORIGIN),
                format!("{}/organization/b", ORIGIN),
            ]
        );
        assert_eq!(page.selectors_seen().len(), 1);
    }

    #[tokio::test]
    async fn test_no_entries_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let run = ScrapeRun::new(&config(false, &dir)).unwrap().with_progress(false);
        let mut page = FakePage::new(ORIGIN).with_load_more(1);
        let fetcher = FakeFetcher::new();

        let err = run.run(&mut page, &fetcher).await.unwrap_err();

        assert!(matches!(err, ScraperError::NoEntries { .. }));
        assert!(fetcher.requests().is_empty());
        assert!(!dir.path().join("rso_emails.csv").exists());
    }

    #[tokio::test]
    async fn test_fetch_errors_do_not_abort() {
        let dir = TempDir::new().unwrap();
        let run = ScrapeRun::new(&config(false, &dir)).unwrap().with_progress(false);
        let mut page = listing();
        let fetcher = FakeFetcher::new()
            .unreachable("/organization/a")
            .page("/organization/b", 200, "board: beta@uw.edu");

        let (rows, stats) = run.collect(&mut page, &fetcher).await.unwrap();

        assert_eq!(rows[0].email, "");
        assert_eq!(rows[1].email, "beta@uw.edu");
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn test_color_setting_reaches_progress() {
        let dir = TempDir::new().unwrap();
        let run = ScrapeRun::new(&config(false, &dir)).unwrap();
        assert!(run.colored);

        let run = run.with_color(false);
        assert!(!run.colored);
        assert!(run.show_progress);

        let tracker = run.progress_tracker(3);
        assert!(!tracker.is_colored());
        assert_eq!(tracker.get_stats().entries, 3);
    }

    #[tokio::test]
    async fn test_page_failure_aborts_before_export() {
        let dir = TempDir::new().unwrap();
        let run = ScrapeRun::new(&config(false, &dir)).unwrap().with_progress(false);
        let mut page = listing().failing_load_more();
        let fetcher = detail_pages();

        assert!(run.run(&mut page, &fetcher).await.is_err());
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
