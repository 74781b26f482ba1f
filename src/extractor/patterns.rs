// file: src/extractor/patterns.rs
// description: compiled regex patterns for contact email extraction
// reference: https://docs.rs/regex

use crate::error::{Result, ScraperError};
use lazy_static::lazy_static;
use regex::Regex;

pub const DEFAULT_EMAIL_DOMAIN: &str = "uw.edu";

/// Characters accepted in the local part of an address.
const LOCAL_PART: &str = r"[A-Za-z0-9._%+-]+";

lazy_static! {
    pub static ref UW_EMAIL: Regex = Regex::new(
        r"(?-u:\b)[A-Za-z0-9._%+-]+@uw\.edu(?-u:\b)"
    ).expect("UW_EMAIL regex is valid");
}

/// Builds `<local>@<domain>` between ASCII word boundaries, the domain matched literally.
/// Non-ASCII letters count as separators, so `éfoo@uw.edu` still yields `foo@uw.edu`.
pub fn email_pattern(domain: &str) -> Result<Regex> {
    if domain == DEFAULT_EMAIL_DOMAIN {
        return Ok(UW_EMAIL.clone());
    }

    let pattern = format!(r"(?-u:\b){}@{}(?-u:\b)", LOCAL_PART, regex::escape(domain));
    Regex::new(&pattern).map_err(|e| {
        ScraperError::Validation(format!("Cannot build email pattern for {}: {}", domain, e))
    })
}

/// Finds the first address under a fixed domain in a page body.
#[derive(Debug, Clone)]
pub struct EmailMatcher {
    domain: String,
    pattern: Regex,
}

impl EmailMatcher {
    pub fn new(domain: &str) -> Result<Self> {
        Ok(Self {
            domain: domain.to_string(),
            pattern: email_pattern(domain)?,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn first_match<'a>(&self, body: &'a str) -> Option<&'a str> {
        self.pattern.find(body).map(|m| m.as_str())
    }
}

impl Default for EmailMatcher {
    fn default() -> Self {
        Self {
            domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            pattern: UW_EMAIL.clone(),
        }
    }
}
