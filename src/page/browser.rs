// file: src/page/browser.rs
// description: page accessor backed by a live chromium tab
// reference: https://docs.rs/chromiumoxide

use crate::error::{Result, ScraperError};
use crate::models::ListingEntry;
use crate::page::{EntrySelectors, PageAccessor, normalize_label};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

pub struct BrowserPage {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl BrowserPage {
    /// Launches chromium and waits for `url` to finish its initial navigation.
    pub async fn launch(url: &Url, headless: bool) -> Result<Self> {
        let mut builder = BrowserConfig::builder();
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(ScraperError::Browser)?;

        let (browser, mut events) = Browser::launch(config)
            .await
            .map_err(|e| ScraperError::Browser(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        info!("Opening {} in chromium", url);
        let page = browser
            .new_page(url.as_str())
            .await
            .map_err(|e| ScraperError::Browser(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| ScraperError::Browser(e.to_string()))?;

        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    pub async fn close(mut self) -> Result<()> {
        if let Err(e) = self.browser.close().await {
            warn!("Chromium did not close cleanly: {}", e);
        }
        self.handler.abort();
        Ok(())
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| ScraperError::Page(e.to_string()))?;
        result
            .into_value::<T>()
            .map_err(|e| ScraperError::Page(format!("Unexpected script result: {}", e)))
    }
}

/// JSON string literal, safe to splice into a script.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn load_more_script(label: &str) -> String {
    format!(
        r#"(() => {{
            const wanted = {label};
            const btn = Array.from(document.querySelectorAll("button"))
                .find(b => b.innerText.trim().toLowerCase() === wanted);
            if (!btn) return false;
            btn.click();
            return true;
        }})()"#,
        label = js_string(&normalize_label(label))
    )
}

fn entries_script(selectors: &EntrySelectors) -> String {
    format!(
        r#"(() => Array.from(document.querySelectorAll({results})).map(a => {{
            const ex = a.querySelector({excerpt});
            return {{
                href: a.getAttribute("href") || "",
                text: a.innerText,
                excerpt: ex ? ex.innerText : null
            }};
        }}))()"#,
        results = js_string(&selectors.results),
        excerpt = js_string(&selectors.excerpt)
    )
}

#[async_trait]
impl PageAccessor for BrowserPage {
    async fn origin(&self) -> Result<Url> {
        let current = self
            .page
            .url()
            .await
            .map_err(|e| ScraperError::Page(e.to_string()))?
            .ok_or_else(|| ScraperError::Page("Page has no URL".to_string()))?;
        let current = Url::parse(&current)?;
        Ok(Url::parse(&current.origin().ascii_serialization())?)
    }

    async fn activate_load_more(&mut self, label: &str) -> Result<bool> {
        let clicked: bool = self.eval(load_more_script(label)).await?;
        debug!("Load more lookup: {}", if clicked { "clicked" } else { "absent" });
        Ok(clicked)
    }

    async fn entries(&mut self, selectors: &EntrySelectors) -> Result<Vec<ListingEntry>> {
        self.eval(entries_script(selectors)).await
    }
}
