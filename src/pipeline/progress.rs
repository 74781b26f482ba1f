// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for detail lookups
// reference: uses indicatif for progress bars and tracks lookup outcomes

use crate::pipeline::detail::DetailOutcome;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub entries: usize,
    pub emails_found: usize,
    pub no_match: usize,
    pub http_failures: usize,
    pub errors: usize,
    pub activations: u32,
    pub pagination_capped: bool,
    pub duration: Duration,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookups(&self) -> usize {
        self.emails_found + self.no_match + self.http_failures + self.errors
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            return 0.0;
        }
        (self.emails_found as f64 / total as f64) * 100.0
    }

    pub fn lookups_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.lookups() as f64 / secs
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    entries: usize,
    colored: bool,
    emails_found: AtomicUsize,
    no_match: AtomicUsize,
    http_failures: AtomicUsize,
    errors: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(entries: usize) -> Self {
        Self::with_target(entries, ProgressDrawTarget::stderr(), true)
    }

    pub fn with_color(entries: usize, colored: bool) -> Self {
        Self::with_target(entries, ProgressDrawTarget::stderr(), colored)
    }

    /// Counts outcomes without drawing anything.
    pub fn hidden(entries: usize) -> Self {
        Self::with_target(entries, ProgressDrawTarget::hidden(), false)
    }

    fn with_target(entries: usize, target: ProgressDrawTarget, colored: bool) -> Self {
        let multi_progress = MultiProgress::with_draw_target(target);

        let main_bar = create_progress_bar(&multi_progress, entries as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            entries,
            colored,
            emails_found: AtomicUsize::new(0),
            no_match: AtomicUsize::new(0),
            http_failures: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    pub fn start_lookup(&self, name: &str) {
        self.main_bar.set_message(name.to_string());
    }

    pub fn record(&self, outcome: &DetailOutcome) {
        let counter = match outcome {
            DetailOutcome::Found(_) => &self.emails_found,
            DetailOutcome::NoMatch => &self.no_match,
            DetailOutcome::HttpStatus(_) => &self.http_failures,
            DetailOutcome::Failed(_) => &self.errors,
        };
        counter.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Lookups complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> RunStats {
        RunStats {
            entries: self.entries,
            emails_found: self.emails_found.load(Ordering::SeqCst),
            no_match: self.no_match.load(Ordering::SeqCst),
            http_failures: self.http_failures.load(Ordering::SeqCst),
            errors: self.errors.load(Ordering::SeqCst),
            activations: 0,
            pagination_capped: false,
            duration: self.start_time.elapsed(),
        }
    }

    fn update_detail_bar(&self) {
        let found = self.emails_found.load(Ordering::SeqCst);
        let missing = self.no_match.load(Ordering::SeqCst);
        let failed =
            self.http_failures.load(Ordering::SeqCst) + self.errors.load(Ordering::SeqCst);

        self.detail_bar.set_message(format!(
            "Emails: {} | No email: {} | Failed: {}",
            found, missing, failed
        ));
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let template = if colored {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}"
    } else {
        "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta}) {msg}"
    };
    let chars = if colored { "█▓▒░" } else { "=>-" };

    let style = ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(chars);
    bar.set_style(style);
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}
