// file: src/utils/telemetry.rs
// description: stage timing for the scrape pipeline
// reference: tracing spans and log-based timing

use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// The four pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pager,
    Extractor,
    DetailFetcher,
    Exporter,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Pager => "pager",
            Stage::Extractor => "extractor",
            Stage::DetailFetcher => "detail fetcher",
            Stage::Exporter => "exporter",
        };
        f.write_str(name)
    }
}

pub struct StageTimer {
    stage: Stage,
    start: Instant,
}

impl StageTimer {
    pub fn start(stage: Stage) -> Self {
        debug!("Starting stage: {}", stage);
        Self {
            stage,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        debug!(
            "Completed stage: {} in {:.2}s",
            self.stage,
            elapsed.as_secs_f64()
        );
        elapsed
    }

    pub fn finish_with_count(self, count: usize) -> Duration {
        let elapsed = self.elapsed();
        let secs = elapsed.as_secs_f64();
        info!(
            "Completed stage: {} - {} items in {:.2}s ({:.2} items/sec)",
            self.stage,
            count,
            secs,
            if secs > 0.0 { count as f64 / secs } else { 0.0 }
        );
        elapsed
    }

    pub fn warn_if_slow(&self, threshold: Duration, message: &str) {
        let elapsed = self.elapsed();
        if elapsed > threshold {
            warn!(
                "Slow stage [{}]: {} took {:.2}s (threshold: {:.2}s)",
                self.stage,
                message,
                elapsed.as_secs_f64(),
                threshold.as_secs_f64()
            );
        }
    }
}
