// file: src/testing.rs
// description: scripted page and fetcher fakes for pipeline tests

use crate::error::{Result, ScraperError};
use crate::fetcher::{FetchResponse, Fetcher};
use crate::models::ListingEntry;
use crate::page::{EntrySelectors, PageAccessor, normalize_label};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

const FAKE_LABEL: &str = "Load More";

/// A listing whose "load more" control is present for a scripted number of lookups.
pub struct FakePage {
    origin: Url,
    remaining: u32,
    lookups: u32,
    activations: u32,
    fail_load_more: bool,
    entries: Vec<ListingEntry>,
    selectors_seen: Vec<EntrySelectors>,
}

impl FakePage {
    pub fn new(origin: &str) -> Self {
        Self {
            origin: Url::parse(origin).expect("fake origin is a valid url"),
            remaining: 0,
            lookups: 0,
            activations: 0,
            fail_load_more: false,
            entries: Vec::new(),
            selectors_seen: Vec::new(),
        }
    }

    pub fn with_load_more(mut self, appearances: u32) -> Self {
        self.remaining = appearances;
        self
    }

    pub fn failing_load_more(mut self) -> Self {
        self.fail_load_more = true;
        self
    }

    pub fn entry(mut self, entry: ListingEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn lookups(&self) -> u32 {
        self.lookups
    }

    pub fn activations(&self) -> u32 {
        self.activations
    }

    pub fn selectors_seen(&self) -> &[EntrySelectors] {
        &self.selectors_seen
    }
}

#[async_trait]
impl PageAccessor for FakePage {
    async fn origin(&self) -> Result<Url> {
        Ok(self.origin.clone())
    }

    async fn activate_load_more(&mut self, label: &str) -> Result<bool> {
        if self.fail_load_more {
            return Err(ScraperError::Page("target closed".to_string()));
        }

        self.lookups += 1;
        if self.remaining == 0 || normalize_label(FAKE_LABEL) != normalize_label(label) {
            return Ok(false);
        }

        self.remaining -= 1;
        self.activations += 1;
        Ok(true)
    }

    async fn entries(&mut self, selectors: &EntrySelectors) -> Result<Vec<ListingEntry>> {
        self.selectors_seen.push(selectors.clone());
        Ok(self.entries.clone())
    }
}

enum Reply {
    Page(FetchResponse),
    Unreachable,
}

/// Serves canned responses by path; unknown paths answer 404.
pub struct FakeFetcher {
    replies: HashMap<String, Reply>,
    requests: Mutex<Vec<String>>,
}

impl Default for FakeFetcher {
    fn default() -> Self {
        Self {
            replies: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, path: &str, status: u16, body: &str) -> Self {
        self.replies
            .insert(path.to_string(), Reply::Page(FetchResponse::new(status, body)));
        self
    }

    pub fn unreachable(mut self, path: &str) -> Self {
        self.replies.insert(path.to_string(), Reply::Unreachable);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn get(&self, url: &Url) -> Result<FetchResponse> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(url.to_string());

        match self.replies.get(url.path()) {
            Some(Reply::Page(response)) => Ok(response.clone()),
            Some(Reply::Unreachable) => Err(ScraperError::Page(format!(
                "connection refused: {}",
                url
            ))),
            None => Ok(FetchResponse::new(404, "")),
        }
    }
}
