use crate::models::ProductRecord;
use crate::scrapers::extractor::FieldExtractor;
use crate::scrapers::traits::Fetcher;
use crate::scrapers::types::SiteProfile;
use anyhow::Result;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successful records, in input URL order
    pub records: Vec<ProductRecord>,
    pub failed: usize,
    pub batches: usize,
    pub pauses: usize,
}

/// Fetches and extracts product pages in fixed-size groups with a pause between groups
pub struct BatchRunner {
    fetcher: Arc<dyn Fetcher>,
    extractor: FieldExtractor,
    batch_size: usize,
    batch_delay: Duration,
}

impl BatchRunner {
    pub fn new(fetcher: Arc<dyn Fetcher>, profile: SiteProfile) -> Result<Self> {
        let batch_size = profile.batch_size.max(1);
        let batch_delay = profile.batch_delay;

        Ok(Self {
            fetcher,
            extractor: FieldExtractor::new(profile)?,
            batch_size,
            batch_delay,
        })
    }

    /// Fetch one detail page and extract its record
    pub async fn scrape_product(&self, url: &str) -> Result<ProductRecord> {
        let html = self.fetcher.fetch(url).await?;
        Ok(self.extractor.extract(&html, url))
    }

    pub async fn run_all(&self, urls: &[String]) -> BatchReport {
        let mut report = BatchReport::default();
        if urls.is_empty() {
            return report;
        }

        info!("=== Extracting Data from {} Products ===", urls.len());

        let total_batches = urls.len().div_ceil(self.batch_size);

        for (batch_index, batch) in urls.chunks(self.batch_size).enumerate() {
            let batch_number = batch_index + 1;
            let offset = batch_index * self.batch_size;
            info!(
                "[Batch {}/{}] Processing {} products...",
                batch_number,
                total_batches,
                batch.len()
            );

            // join_all keeps results in input order
            let results = join_all(batch.iter().map(|url| self.scrape_product(url))).await;

            let mut succeeded = 0;
            for (i, (url, result)) in batch.iter().zip(results).enumerate() {
                let position = offset + i + 1;
                match result {
                    Ok(record) => {
                        info!(
                            "  [{}/{}] ✓ {} {}",
                            position,
                            urls.len(),
                            record.brand,
                            record.model
                        );
                        succeeded += 1;
                        report.records.push(record);
                    }
                    Err(e) => {
                        warn!("  [{}/{}] ✗ Failed to extract data from {}: {:#}", position, urls.len(), url, e);
                        report.failed += 1;
                    }
                }
            }

            report.batches += 1;
            info!(
                "  ✓ Batch {} completed ({}/{} successful)",
                batch_number,
                succeeded,
                batch.len()
            );

            if batch_number < total_batches {
                tokio::time::sleep(self.batch_delay).await;
                report.pauses += 1;
            }
        }

        report
    }
}
