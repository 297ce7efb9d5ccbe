use anyhow::Result;
use async_trait::async_trait;

/// Source of raw HTML for a URL.
/// The HTTP client implements it in production; tests plug in canned pages.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the page body, failing on transport errors, timeouts and non-success statuses
    async fn fetch(&self, url: &str) -> Result<String>;

    /// Name of the fetcher, used in log lines
    fn source_name(&self) -> &'static str;
}
