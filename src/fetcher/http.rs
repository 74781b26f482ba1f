// file: src/fetcher/http.rs
// description: reqwest-backed fetcher for listing and detail pages
// reference: https://docs.rs/reqwest

use crate::config::DetailConfig;
use crate::error::Result;
use crate::fetcher::{FetchResponse, Fetcher};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    pub fn from_config(config: &DetailConfig) -> Result<Self> {
        Self::new(config.timeout(), &config.user_agent)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &Url) -> Result<FetchResponse> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(FetchResponse { status, body })
    }
}
