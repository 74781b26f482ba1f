// file: src/pipeline/detail.rs
// description: fetches an organization's detail page and pulls out its contact email
// reference: per-entry secondary request, failures absorbed as "email unknown"

use crate::extractor::EmailMatcher;
use crate::fetcher::Fetcher;
use tracing::{debug, error, warn};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    Found(String),
    /// The page loaded but contains no matching address.
    NoMatch,
    HttpStatus(u16),
    Failed(String),
}

impl DetailOutcome {
    /// The address, or `""` for every other outcome.
    pub fn email(&self) -> &str {
        match self {
            DetailOutcome::Found(email) => email.as_str(),
            _ => "",
        }
    }

    pub fn into_email(self) -> String {
        match self {
            DetailOutcome::Found(email) => email,
            _ => String::new(),
        }
    }
}

pub struct DetailFetcher<'a> {
    fetcher: &'a dyn Fetcher,
    matcher: EmailMatcher,
}

impl<'a> DetailFetcher<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, matcher: EmailMatcher) -> Self {
        Self { fetcher, matcher }
    }

    /// Never fails: every problem is logged and reported as an outcome.
    pub async fn lookup(&self, origin: &Url, href: &str) -> DetailOutcome {
        let url = match origin.join(href) {
            Ok(url) => url,
            Err(e) => {
                error!("Cannot resolve {} against {}: {}", href, origin, e);
                return DetailOutcome::Failed(e.to_string());
            }
        };

        match self.fetcher.get(&url).await {
            Ok(response) if !response.is_success() => {
                warn!("Failed to fetch {}: {}", url, response.status);
                DetailOutcome::HttpStatus(response.status)
            }
            Ok(response) => match self.matcher.first_match(&response.body) {
                Some(email) => DetailOutcome::Found(email.to_string()),
                None => {
                    debug!("No @{} address on {}", self.matcher.domain(), url);
                    DetailOutcome::NoMatch
                }
            },
            Err(e) => {
                error!("Error fetching/parsing {}: {}", url, e);
                DetailOutcome::Failed(e.to_string())
            }
        }
    }
}
