// file: src/page/static_page.rs
// description: page accessor over a static html document (fetched or saved to disk)
// reference: https://docs.rs/scraper

use crate::error::{Result, ScraperError};
use crate::fetcher::Fetcher;
use crate::models::ListingEntry;
use crate::page::text::visible_text;
use crate::page::{EntrySelectors, PageAccessor, normalize_label};
use crate::utils::Validator;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use url::Url;

/// A listing page that cannot run scripts.
///
/// A "load more" control in the markup cannot be activated here, so it is reported as
/// absent after a one-time warning that the listing may be incomplete.
pub struct StaticPage {
    url: Url,
    html: String,
    warned_load_more: bool,
}

impl StaticPage {
    pub fn from_html(url: Url, html: impl Into<String>) -> Self {
        Self {
            url,
            html: html.into(),
            warned_load_more: false,
        }
    }

    /// Reads a saved listing; `url` is where it was saved from.
    pub fn load(path: &Path, url: Url) -> Result<Self> {
        let html = fs::read_to_string(path)?;
        info!("Loaded listing snapshot {} ({} bytes)", path.display(), html.len());
        Ok(Self::from_html(url, html))
    }

    pub async fn fetch(fetcher: &dyn Fetcher, url: Url) -> Result<Self> {
        info!("Fetching listing {}", url);
        let response = fetcher.get(&url).await?;
        if !response.is_success() {
            return Err(ScraperError::Page(format!(
                "Listing {} returned HTTP {}",
                url, response.status
            )));
        }
        Ok(Self::from_html(url, response.body))
    }

    fn has_control(&self, label: &str) -> Result<bool> {
        let buttons = Validator::validate_selector("button")?;
        let wanted = normalize_label(label);
        let document = Html::parse_document(&self.html);

        let found = document
            .select(&buttons)
            .any(|button| normalize_label(&visible_text(button)) == wanted);
        Ok(found)
    }

    fn collect_entries(&self, results: &Selector, excerpt: &Selector) -> Vec<ListingEntry> {
        let document = Html::parse_document(&self.html);

        document
            .select(results)
            .map(|anchor| ListingEntry {
                href: anchor.value().attr("href").unwrap_or_default().to_string(),
                text: visible_text(anchor),
                excerpt: anchor.select(excerpt).next().map(visible_text),
            })
            .collect()
    }
}

#[async_trait]
impl PageAccessor for StaticPage {
    async fn origin(&self) -> Result<Url> {
        Ok(Url::parse(&self.url.origin().ascii_serialization())?)
    }

    async fn activate_load_more(&mut self, label: &str) -> Result<bool> {
        if self.has_control(label)? && !self.warned_load_more {
            warn!(
                "Listing contains a \"{}\" control that a static page cannot activate; results may be truncated (use the browser backend)",
                label
            );
            self.warned_load_more = true;
        }
        Ok(false)
    }

    async fn entries(&mut self, selectors: &EntrySelectors) -> Result<Vec<ListingEntry>> {
        let results = Validator::validate_selector(&selectors.results)?;
        let excerpt = Validator::validate_selector(&selectors.excerpt)?;

        let entries = self.collect_entries(&results, &excerpt);
        debug!("Static page matched {} entries", entries.len());
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    const LISTING: &str = r#"<!DOCTYPE html>
<html><body>
  <nav><a href="/organization/not-a-result">Sidebar</a></nav>
  <div id="org-search-results">
    <a href="/organization/a">
      <div><h2>Alpha Club</h2><p class="DescriptionExcerpt"> A tech club. </p></div>
    </a>
    <a href="/events/1">Some event</a>
    <a href="/organization/b"><div><h2>Beta League</h2></div></a>
  </div>
  <button> Load More </button>
</body></html>"#;

    fn page() -> StaticPage {
        let url = Url::parse("https://huskylink.washington.edu/organizations?query=club").unwrap();
        StaticPage::from_html(url, LISTING)
    }

    fn selectors() -> EntrySelectors {
        EntrySelectors::from(&Config::default_config().selectors)
    }

    #[tokio::test]
    async fn test_origin_drops_path_and_query() {
        let origin = page().origin().await.unwrap();
        assert_eq!(origin.as_str(), "https://huskylink.washington.edu/");
    }

    #[tokio::test]
    async fn test_entries_follow_results_selector() {
        let mut page = page();
        let entries = page.entries(&selectors()).await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].href, "/organization/a");
        assert_eq!(entries[0].text, "Alpha Club\nA tech club.");
        assert_eq!(entries[0].excerpt.as_deref(), Some("A tech club."));
        assert_eq!(entries[1].href, "/organization/b");
        assert_eq!(entries[1].excerpt, None);
    }

    #[tokio::test]
    async fn test_load_more_is_never_activated() {
        let mut page = page();
        assert!(!page.activate_load_more("load more").await.unwrap());
        assert!(page.warned_load_more);
        assert!(!page.activate_load_more("load more").await.unwrap());
    }

    #[tokio::test]
    async fn test_load_snapshot_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listing.html");
        fs::write(&path, LISTING).unwrap();

        let url = Url::parse("https://huskylink.washington.edu/organizations").unwrap();
        let mut page = StaticPage::load(&path, url).unwrap();
        assert_eq!(page.entries(&selectors()).await.unwrap().len(), 2);
    }
}
