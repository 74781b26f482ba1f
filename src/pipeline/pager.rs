// file: src/pipeline/pager.rs
// description: expands the listing by activating its "load more" control until it disappears
// reference: fixed-delay polling loop

use crate::config::Config;
use crate::error::Result;
use crate::page::PageAccessor;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagerOutcome {
    pub activations: u32,
    /// The activation cap stopped expansion; the control may still be present.
    pub capped: bool,
}

pub struct Pager {
    label: String,
    delay: Duration,
    max_activations: Option<u32>,
}

impl Pager {
    pub fn new(label: impl Into<String>, delay: Duration, max_activations: Option<u32>) -> Self {
        Self {
            label: label.into(),
            delay,
            max_activations,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.selectors.load_more_label.clone(),
            config.pager.delay(),
            config.pager.max_activations,
        )
    }

    /// One activation per pass, then a fixed wait for appended content.
    ///
    /// Without a cap this never returns while the control keeps reappearing.
    pub async fn expand<P>(&self, page: &mut P) -> Result<PagerOutcome>
    where
        P: PageAccessor + ?Sized,
    {
        info!("Expanding all results");
        let mut outcome = PagerOutcome::default();

        loop {
            if let Some(max) = self.max_activations {
                if outcome.activations >= max {
                    warn!(
                        "Stopped after {} \"{}\" activations; listing may be incomplete",
                        max, self.label
                    );
                    outcome.capped = true;
                    break;
                }
            }

            if !page.activate_load_more(&self.label).await? {
                break;
            }

            outcome.activations += 1;
            debug!("Activated \"{}\" ({})", self.label, outcome.activations);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        info!(
            "All results loaded ({} load-more activations)",
            outcome.activations
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePage;

    fn pager(max: Option<u32>) -> Pager {
        Pager::new("load more", Duration::ZERO, max)
    }

    #[tokio::test]
    async fn test_activates_once_per_appearance() {
        for appearances in [0, 1, 5] {
            let mut page = FakePage::new("https://example.edu").with_load_more(appearances);
            let outcome = pager(None).expand(&mut page).await.unwrap();

            assert_eq!(outcome.activations, appearances);
            assert_eq!(page.activations(), appearances);
            assert!(!outcome.capped);
            // one final lookup that finds nothing
            assert_eq!(page.lookups(), appearances + 1);
        }
    }

    #[tokio::test]
    async fn test_cap_stops_a_persistent_control() {
        let mut page = FakePage::new("https://example.edu").with_load_more(u32::MAX);
        let outcome = pager(Some(3)).expand(&mut page).await.unwrap();

        assert_eq!(outcome.activations, 3);
        assert!(outcome.capped);
        assert_eq!(page.activations(), 3);
    }

    #[tokio::test]
    async fn test_label_must_match() {
        let mut page = FakePage::new("https://example.edu").with_load_more(2);
        let outcome = Pager::new("show more", Duration::ZERO, None)
            .expand(&mut page)
            .await
            .unwrap();
        assert_eq!(outcome.activations, 0);
    }

    #[test]
    fn test_page_errors_propagate() {
        let mut page = FakePage::new("https://example.edu").failing_load_more();
        let result = tokio_test::block_on(pager(None).expand(&mut page));
        assert!(result.is_err());
    }
}
