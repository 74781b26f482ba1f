// file: src/config.rs
// description: application configuration management with toml and environment support
// reference: https://docs.rs/config

use crate::error::{Result, ScraperError};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "RSO_SCRAPER";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub source: SourceConfig,
    pub selectors: SelectorConfig,
    pub pager: PagerConfig,
    pub detail: DetailConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Static,
    Browser,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    pub listing_url: String,
    /// Saved listing HTML; `listing_url` still supplies the origin.
    pub snapshot: Option<PathBuf>,
    pub backend: Backend,
    pub headless: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectorConfig {
    pub results: String,
    pub excerpt: String,
    pub load_more_label: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PagerConfig {
    pub delay_ms: u64,
    pub max_activations: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetailConfig {
    pub email_domain: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    pub include_description: bool,
    pub output_dir: PathBuf,
    pub file_name: Option<String>,
}

impl PagerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl DetailConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Layers: built-in defaults, then the TOML file, then `RSO_SCRAPER__*` variables.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| ScraperError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| ScraperError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ScraperError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            source: SourceConfig {
                listing_url: "https://huskylink.washington.edu/organizations".to_string(),
                snapshot: None,
                backend: Backend::Static,
                headless: true,
            },
            selectors: SelectorConfig {
                results: "#org-search-results a[href^='/organization/']".to_string(),
                excerpt: ".DescriptionExcerpt".to_string(),
                load_more_label: "load more".to_string(),
            },
            pager: PagerConfig {
                delay_ms: 1500,
                max_activations: None,
            },
            detail: DetailConfig {
                email_domain: "uw.edu".to_string(),
                timeout_secs: 30,
                user_agent: format!("rso_scraper/{}", env!("CARGO_PKG_VERSION")),
            },
            export: ExportConfig {
                include_description: false,
                output_dir: PathBuf::from("."),
                file_name: None,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_url(&self.source.listing_url)
            .map_err(|e| ScraperError::Config(format!("source.listing_url: {}", e)))?;

        Validator::validate_email_domain(&self.detail.email_domain)
            .map_err(|e| ScraperError::Config(format!("detail.email_domain: {}", e)))?;

        Validator::validate_selector(&self.selectors.results)?;
        Validator::validate_selector(&self.selectors.excerpt)?;

        if self.selectors.load_more_label.trim().is_empty() {
            return Err(ScraperError::Config(
                "selectors.load_more_label cannot be empty".to_string(),
            ));
        }

        if self.detail.timeout_secs == 0 {
            return Err(ScraperError::Config(
                "detail.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if let Some(name) = &self.export.file_name {
            Validator::validate_csv_name(name)
                .map_err(|e| ScraperError::Config(format!("export.file_name: {}", e)))?;
        }

        if self.source.backend == Backend::Browser && !cfg!(feature = "browser") {
            return Err(ScraperError::Config(
                "backend \"browser\" requires building with --features browser".to_string(),
            ));
        }

        Ok(())
    }
}
