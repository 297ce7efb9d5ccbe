use crate::scrapers::traits::Fetcher;
use crate::scrapers::types::SiteProfile;
use crate::scrapers::parse_selector;
use anyhow::{Context, Result};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Follows "next page" links through the catalog and collects product URLs
pub struct PageWalker {
    fetcher: Arc<dyn Fetcher>,
    profile: SiteProfile,
    base: Url,
    product_link: Selector,
    fallback_link: Selector,
    next_page: Selector,
}

impl PageWalker {
    pub fn new(fetcher: Arc<dyn Fetcher>, profile: SiteProfile) -> Result<Self> {
        let base = Url::parse(&profile.base_url)
            .with_context(|| format!("Invalid base URL {}", profile.base_url))?;

        Ok(Self {
            product_link: parse_selector(&profile.selectors.product_link)?,
            fallback_link: parse_selector(&profile.selectors.fallback_link)?,
            next_page: parse_selector(&profile.selectors.next_page)?,
            fetcher,
            profile,
            base,
        })
    }

    /// Product URLs from every reachable listing page, deduplicated in first-seen order.
    /// A page that fails to load ends the walk with whatever was collected before it.
    pub async fn walk(&self, start_url: &str) -> Vec<String> {
        info!("=== Starting Product URL Extraction ===");

        let mut seen: HashSet<String> = HashSet::new();
        let mut product_urls: Vec<String> = Vec::new();
        let mut current_url = start_url.to_string();
        let mut page = 1;

        loop {
            if page > self.profile.max_pages {
                warn!("Reached maximum page limit ({}), stopping", self.profile.max_pages);
                break;
            }

            info!("Processing Page {}: {}", page, current_url);

            let html = match self.fetcher.fetch(&current_url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Error processing page {}: {:#}", page, e);
                    break;
                }
            };

            // Html is not Send; keep it out of scope across the pause below
            let (page_urls, next_url) = {
                let document = Html::parse_document(&html);
                (self.product_links(&document), self.next_page_url(&document))
            };

            info!("Found {} product URLs", page_urls.len());
            for url in page_urls {
                if seen.insert(url.clone()) {
                    product_urls.push(url);
                }
            }

            match next_url {
                Some(next) if next != current_url => {
                    current_url = next;
                    page += 1;
                    tokio::time::sleep(self.profile.page_delay).await;
                }
                _ => break,
            }
        }

        info!("✓ Total unique product URLs: {}", product_urls.len());
        product_urls
    }

    /// Links from the primary product selector, or anchors pointing at product pages
    pub fn product_links(&self, document: &Html) -> Vec<String> {
        let primary: Vec<String> = document
            .select(&self.product_link)
            .filter_map(|link| link.value().attr("href"))
            .filter_map(|href| self.absolutize(href))
            .collect();

        if !primary.is_empty() {
            return primary;
        }

        debug!("No primary product links, trying fallback selector");
        let marker = &self.profile.selectors.product_path_marker;
        document
            .select(&self.fallback_link)
            .filter_map(|link| link.value().attr("href"))
            .filter(|href| href.contains(marker.as_str()))
            .filter_map(|href| self.absolutize(href))
            .collect()
    }

    pub fn next_page_url(&self, document: &Html) -> Option<String> {
        document
            .select(&self.next_page)
            .next()
            .and_then(|link| link.value().attr("href"))
            .and_then(|href| self.absolutize(href))
    }

    fn absolutize(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        if href.starts_with("http") {
            return Some(href.to_string());
        }
        self.base.join(href).ok().map(String::from)
    }
}
