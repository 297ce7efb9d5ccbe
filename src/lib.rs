pub mod config;
pub mod models;
pub mod scrapers;
pub mod sink;

use anyhow::Result;
use config::Config;
use models::ProductRecord;
use scrapers::{BatchRunner, Fetcher, PageWalker, SiteProfile};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Walk the catalog, then scrape every product found.
/// Individual page and product failures only shrink the result.
pub async fn run_once(
    config: &Config,
    profile: &SiteProfile,
    fetcher: Arc<dyn Fetcher>,
) -> Result<Vec<ProductRecord>> {
    let started = Instant::now();
    info!("=== Starting Product Data Extraction ({}) ===", fetcher.source_name());

    let walker = PageWalker::new(fetcher.clone(), profile.clone())?;
    let product_urls = walker.walk(&config.parent_url).await;

    if product_urls.is_empty() {
        info!("No product URLs found");
        return Ok(Vec::new());
    }

    let runner = BatchRunner::new(fetcher, profile.clone())?;
    let report = runner.run_all(&product_urls).await;

    info!(
        "Run finished: {} records, {} failures, {} batches in {:.1}s",
        report.records.len(),
        report.failed,
        report.batches,
        started.elapsed().as_secs_f64()
    );

    Ok(report.records)
}
