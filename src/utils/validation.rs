// file: src/utils/validation.rs
// description: input validation for urls, email domains, selectors and output names
// reference: input validation patterns

use crate::error::{Result, ScraperError};
use scraper::Selector;
use std::path::Path;
use url::Url;

pub struct Validator;

impl Validator {
    pub fn validate_url(url: &str) -> Result<Url> {
        let parsed = Url::parse(url).map_err(|e| {
            ScraperError::Validation(format!("Invalid URL format: {} ({})", url, e))
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ScraperError::Validation(format!(
                    "Unsupported URL scheme {} in {}",
                    other, url
                )));
            }
        }

        if parsed.host_str().is_none() {
            return Err(ScraperError::Validation(format!(
                "URL has no host: {}",
                url
            )));
        }

        Ok(parsed)
    }

    pub fn validate_email_domain(domain: &str) -> Result<()> {
        if domain.trim().is_empty() {
            return Err(ScraperError::Validation(
                "Email domain cannot be empty".to_string(),
            ));
        }

        if domain.contains('@') || domain.chars().any(char::is_whitespace) {
            return Err(ScraperError::Validation(format!(
                "Email domain must be a bare host name: {:?}",
                domain
            )));
        }

        Ok(())
    }

    pub fn validate_selector(selector: &str) -> Result<Selector> {
        Selector::parse(selector).map_err(|e| ScraperError::Selector {
            selector: selector.to_string(),
            message: format!("{:?}", e),
        })
    }

    pub fn validate_csv_name(name: &str) -> Result<()> {
        let path = Path::new(name);

        if path.components().count() != 1 {
            return Err(ScraperError::Validation(format!(
                "File name must not contain directories: {}",
                name
            )));
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(()),
            _ => Err(ScraperError::Validation(format!(
                "File name must end in .csv: {}",
                name
            ))),
        }
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((idx, _)) => format!("{}...", &text[..idx]),
            None => text.to_string(),
        }
    }
}
