use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use watch_scout::config::{Config, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use watch_scout::scrapers::{HttpFetcher, SiteProfile};
use watch_scout::sink::Sink;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the JSON config file
    #[arg(env = CONFIG_PATH_ENV, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Re-run the whole scrape every checkIntervalMs
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("⌚ Watch Scout - Daniel de Guy Scraper");
    info!("=====================================");

    let args = Args::parse();
    let watch = args.watch;
    let config = Config::load(&args.config)?;
    let profile = SiteProfile::daniel_de_guy().with_base_url(config.base_origin()?);

    let fetcher = Arc::new(HttpFetcher::new(&profile)?);
    let sink = Sink::new(
        fetcher.client().clone(),
        config.output_path.clone(),
        config.backend_url.clone(),
    );

    if watch && config.check_interval_ms == 0 {
        anyhow::bail!("--watch needs a checkIntervalMs greater than 0");
    }

    loop {
        let records = watch_scout::run_once(&config, &profile, fetcher.clone()).await?;
        sink.deliver(&config.parent_url, &records).await?;

        info!("=== Scraping Complete ===");
        info!("Total watches scraped: {}", records.len());

        if !watch {
            break;
        }

        let interval = config.check_interval();
        match chrono::Duration::from_std(interval) {
            Ok(step) => info!("Next run at {}", (Utc::now() + step).to_rfc3339()),
            Err(_) => warn!("Check interval too large to display"),
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
                break;
            }
        }
    }

    Ok(())
}
