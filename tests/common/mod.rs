#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use watch_scout::scrapers::{Fetcher, SiteProfile};

pub const BASE: &str = "https://shop.test";

/// Serves canned pages; unknown URLs fail like a 404
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(html) => Ok(html.clone()),
            None => anyhow::bail!("Failed to fetch {}: 404 Not Found", url),
        }
    }

    fn source_name(&self) -> &'static str {
        "mock"
    }
}

pub fn profile() -> SiteProfile {
    SiteProfile::daniel_de_guy()
        .with_base_url(BASE)
        .without_delays()
}

pub fn listing_page(product_paths: &[&str], next: Option<&str>) -> String {
    let links: String = product_paths
        .iter()
        .map(|p| format!(r#"<div class="grid-product"><a class="grid-product__link" href="{p}">x</a></div>"#))
        .collect();
    let pagination = match next {
        Some(href) => format!(r#"<div class="pagination"><span class="next"><a href="{href}">Next</a></span></div>"#),
        None => r#"<div class="pagination"></div>"#.to_string(),
    };
    format!("<html><body>{links}{pagination}</body></html>")
}

pub fn product_page(title: &str, price: &str, lines: &[&str]) -> String {
    let description: String = lines.iter().map(|l| format!("<p>{l}</p>")).collect();
    format!(
        r#"<html><head><meta property="og:image" content="//cdn.shop.test/files/{slug}.jpg"></head><body>
        <h1 class="product-single__title">{title}</h1>
        <span class="product__price">{price}</span>
        <div class="product-single__description">{description}</div>
        </body></html>"#,
        slug = title.to_lowercase().replace(' ', "-"),
    )
}
