// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use rso_scraper::utils::logging::{format_error, format_info, format_success, format_warning};
use rso_scraper::{
    Backend, Config, DetailFetcher, DetailOutcome, EmailMatcher, HttpFetcher, RunSummary,
    ScrapeRun, ScraperError, StaticPage, Validator,
};
use std::path::PathBuf;
use tracing::{error, info};
use url::Url;

#[derive(Parser)]
#[command(name = "rso_scraper")]
#[command(author = "cipher")]
#[command(version)]
#[command(about = "Export organization names and contact emails from a directory listing to CSV", long_about = None)]
struct Cli {
    /// TOML configuration; defaults to config/default.toml when present
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand the listing, look up every organization's email and write the CSV
    Scrape {
        /// Listing page to scrape
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        /// Saved listing HTML to read instead of fetching
        #[arg(long, value_name = "FILE", conflicts_with = "browser")]
        snapshot: Option<PathBuf>,

        /// Drive a chromium tab (requires the `browser` feature)
        #[arg(long)]
        browser: bool,

        /// Show the browser window
        #[arg(long, requires = "browser")]
        headed: bool,

        /// Add the Description column
        #[arg(long)]
        with_description: bool,

        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[arg(long, value_name = "NAME")]
        file_name: Option<String>,

        /// Stop pressing "load more" after this many activations
        #[arg(long, value_name = "N")]
        max_load_more: Option<u32>,

        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,

        /// Email domain to match, e.g. uw.edu
        #[arg(long)]
        domain: Option<String>,

        #[arg(long)]
        no_progress: bool,
    },

    /// Look up the email on a single detail page
    Email {
        /// Detail page path (e.g. /organization/thinkcyber) or absolute URL
        target: String,

        /// Origin for relative paths; defaults to the listing URL's origin
        #[arg(long, value_name = "URL")]
        origin: Option<String>,

        #[arg(long)]
        domain: Option<String>,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.color {
        colored::control::set_override(false);
    }
    rso_scraper::utils::logging::init_logger(cli.color, cli.verbose);

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Scrape {
            url,
            snapshot,
            browser,
            headed,
            with_description,
            output,
            file_name,
            max_load_more,
            delay_ms,
            domain,
            no_progress,
        } => {
            let mut config = config;
            if let Some(url) = url {
                config.source.listing_url = url;
            }
            if snapshot.is_some() {
                config.source.snapshot = snapshot;
            }
            if browser {
                config.source.backend = Backend::Browser;
                config.source.snapshot = None;
            }
            if headed {
                config.source.headless = false;
            }
            if with_description {
                config.export.include_description = true;
            }
            if let Some(output) = output {
                config.export.output_dir = output;
            }
            if file_name.is_some() {
                config.export.file_name = file_name;
            }
            if max_load_more.is_some() {
                config.pager.max_activations = max_load_more;
            }
            if let Some(delay_ms) = delay_ms {
                config.pager.delay_ms = delay_ms;
            }
            if let Some(domain) = domain {
                config.detail.email_domain = domain;
            }
            config.validate().context("Invalid scrape options")?;

            cmd_scrape(&config, !no_progress, cli.color).await?;
        }
        Commands::Email {
            target,
            origin,
            domain,
        } => {
            let mut config = config;
            if let Some(domain) = domain {
                config.detail.email_domain = domain;
            }
            cmd_email(&config, &target, origin.as_deref()).await?;
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

async fn cmd_scrape(config: &Config, show_progress: bool, colored: bool) -> Result<()> {
    let listing = Validator::validate_url(&config.source.listing_url)?;
    let fetcher =
        HttpFetcher::from_config(&config.detail).context("Failed to create HTTP client")?;
    let run = ScrapeRun::new(config)?
        .with_progress(show_progress)
        .with_color(colored);

    let result = match config.source.backend {
        Backend::Static => {
            let mut page = match &config.source.snapshot {
                Some(path) => StaticPage::load(path, listing)
                    .with_context(|| format!("Failed to read snapshot {}", path.display()))?,
                None => StaticPage::fetch(&fetcher, listing)
                    .await
                    .context("Failed to fetch listing")?,
            };
            run.run(&mut page, &fetcher).await
        }
        Backend::Browser => scrape_in_browser(config, &run, &fetcher, &listing).await?,
    };

    match result {
        Ok(summary) => {
            report(&summary);
            Ok(())
        }
        Err(err @ ScraperError::NoEntries { .. }) => Err(err.into()),
        Err(err) => {
            error!("Scrape failed: {}", err);
            Err(err).context("Scrape aborted; no CSV written")
        }
    }
}

#[cfg(feature = "browser")]
async fn scrape_in_browser(
    config: &Config,
    run: &ScrapeRun,
    fetcher: &HttpFetcher,
    listing: &Url,
) -> Result<rso_scraper::Result<RunSummary>> {
    let mut page = rso_scraper::BrowserPage::launch(listing, config.source.headless)
        .await
        .context("Failed to launch chromium")?;
    let result = run.run(&mut page, fetcher).await;
    page.close().await?;
    Ok(result)
}

#[cfg(not(feature = "browser"))]
async fn scrape_in_browser(
    _config: &Config,
    _run: &ScrapeRun,
    _fetcher: &HttpFetcher,
    _listing: &Url,
) -> Result<rso_scraper::Result<RunSummary>> {
    Err(anyhow::anyhow!(
        "This build has no browser backend; rebuild with --features browser"
    ))
}

fn report(summary: &RunSummary) {
    println!(
        "{}",
        format_success(&format!(
            "CSV with {} rows written to {}",
            summary.rows,
            summary.output.display()
        ))
    );

    println!(
        "{}",
        format_info(&format!(
            "{} load-more activations, {} of {} organizations with an email",
            summary.stats.activations, summary.stats.emails_found, summary.stats.entries
        ))
    );

    if summary.stats.pagination_capped {
        println!(
            "{}",
            format_warning("Pagination hit --max-load-more; some organizations may be missing")
        );
    }

    let failed = summary.stats.http_failures + summary.stats.errors;
    if failed > 0 {
        println!(
            "{}",
            format_warning(&format!("{} detail pages could not be fetched", failed))
        );
    }

    info!(
        "Finished at {}",
        summary.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

async fn cmd_email(config: &Config, target: &str, origin: Option<&str>) -> Result<()> {
    let origin = match origin {
        Some(origin) => Validator::validate_url(origin)?,
        None => {
            let listing = Validator::validate_url(&config.source.listing_url)?;
            Url::parse(&listing.origin().ascii_serialization())?
        }
    };

    let fetcher =
        HttpFetcher::from_config(&config.detail).context("Failed to create HTTP client")?;
    let matcher = EmailMatcher::new(&config.detail.email_domain)?;
    let detail = DetailFetcher::new(&fetcher, matcher);

    match detail.lookup(&origin, target).await {
        DetailOutcome::Found(email) => println!("{}", email),
        DetailOutcome::NoMatch => eprintln!(
            "{}",
            format_warning(&format!(
                "No @{} address on {}",
                config.detail.email_domain, target
            ))
        ),
        DetailOutcome::HttpStatus(status) => {
            eprintln!("{}", format_error(&format!("HTTP {} for {}", status, target)))
        }
        DetailOutcome::Failed(reason) => {
            eprintln!("{}", format_error(&format!("{}: {}", target, reason)))
        }
    }

    Ok(())
}
