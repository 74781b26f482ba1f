// file: src/page/mod.rs
// description: capability for reading and driving the directory listing page
// reference: injected page accessor so the pipeline runs without a real browser

#[cfg(feature = "browser")]
pub mod browser;
pub mod static_page;
pub mod text;

#[cfg(feature = "browser")]
pub use browser::BrowserPage;
pub use static_page::StaticPage;

use crate::config::SelectorConfig;
use crate::error::Result;
use crate::models::ListingEntry;
use async_trait::async_trait;
use url::Url;

/// CSS selectors the page accessor needs to collect entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySelectors {
    /// Matches every organization anchor.
    pub results: String,
    /// Matches the description node inside an anchor.
    pub excerpt: String,
}

impl From<&SelectorConfig> for EntrySelectors {
    fn from(config: &SelectorConfig) -> Self {
        Self {
            results: config.results.clone(),
            excerpt: config.excerpt.clone(),
        }
    }
}

#[async_trait]
pub trait PageAccessor: Send {
    /// Origin that relative entry links resolve against.
    async fn origin(&self) -> Result<Url>;

    /// Finds a button whose trimmed, lowercased label equals `label` and activates it.
    ///
    /// Returns `false` when no such control exists. Errors mean the page itself failed.
    async fn activate_load_more(&mut self, label: &str) -> Result<bool>;

    /// Every anchor matching `selectors.results`, in document order.
    async fn entries(&mut self, selectors: &EntrySelectors) -> Result<Vec<ListingEntry>>;
}

/// Normalizes a control label the way the listing is matched: trimmed, lowercase.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}
