// file: src/fetcher/mod.rs
// description: capability for retrieving pages by url
// reference: internal module structure

pub mod http;

pub use http::HttpFetcher;

use crate::error::Result;
use async_trait::async_trait;
use url::Url;

/// Status and body of a completed request. Non-2xx statuses are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Errors only when no response was obtained or its body could not be read.
    async fn get(&self, url: &Url) -> Result<FetchResponse>;
}
