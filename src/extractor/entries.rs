// file: src/extractor/entries.rs
// description: turns raw listing entries into organization names and descriptions
// reference: anchor innerText conventions of the directory listing

use crate::error::{Result, ScraperError};
use crate::models::ListingEntry;
use tracing::{debug, error};

/// A listing entry with its name resolved, waiting for its detail lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub href: String,
    pub description: Option<String>,
}

pub struct EntryExtractor {
    include_description: bool,
    selector: String,
}

impl EntryExtractor {
    pub fn new(selector: impl Into<String>, include_description: bool) -> Self {
        Self {
            include_description,
            selector: selector.into(),
        }
    }

    /// Keeps document order and duplicates. Zero entries means the page layout changed.
    pub fn extract(&self, entries: Vec<ListingEntry>) -> Result<Vec<Candidate>> {
        if entries.is_empty() {
            error!(
                "No organization links found for {}. Has the DOM changed?",
                self.selector
            );
            return Err(ScraperError::NoEntries {
                selector: self.selector.clone(),
            });
        }

        let candidates: Vec<Candidate> = entries
            .into_iter()
            .map(|entry| self.candidate(entry))
            .collect();

        debug!("Extracted {} candidates", candidates.len());
        Ok(candidates)
    }

    fn candidate(&self, entry: ListingEntry) -> Candidate {
        let description = if self.include_description {
            Some(
                entry
                    .excerpt
                    .as_deref()
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string(),
            )
        } else {
            None
        };

        Candidate {
            name: first_line(&entry.text).to_string(),
            href: entry.href,
            description,
        }
    }
}

/// First line of the trimmed text.
pub fn first_line(text: &str) -> &str {
    let trimmed = text.trim();
    let line = trimmed.split('\n').next().unwrap_or_default();
    line.strip_suffix('\r').unwrap_or(line)
}
