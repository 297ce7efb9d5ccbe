pub mod batch;
pub mod extractor;
pub mod http;
pub mod images;
pub mod traits;
pub mod types;
pub mod walker;

pub use batch::{BatchReport, BatchRunner};
pub use extractor::FieldExtractor;
pub use http::HttpFetcher;
pub use images::ImageResolver;
pub use traits::Fetcher;
pub use types::SiteProfile;
pub use walker::PageWalker;

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Selector};

pub(crate) fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Failed to parse selector '{}': {:?}", css, e))
}

pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}
