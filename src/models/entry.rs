// file: src/models/entry.rs
// description: raw listing entry as read from the directory page

use serde::{Deserialize, Serialize};

/// One organization anchor as the page reports it, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// The `href` attribute exactly as written, e.g. `/organization/thinkcyber`.
    pub href: String,
    /// Visible text of the anchor, line breaks preserved.
    pub text: String,
    /// Visible text of the nested excerpt element, if the anchor has one.
    #[serde(default)]
    pub excerpt: Option<String>,
}

impl ListingEntry {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
            excerpt: None,
        }
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }
}
