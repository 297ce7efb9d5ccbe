use crate::scrapers::types::IMAGE_NAME_PATTERN;
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashMap;

/// Identity of a logical photo. URLs without a recognizable `name.ext` shape only
/// collapse with exact duplicates of themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PhotoKey {
    Named(String),
    Opaque(String),
}

#[derive(Debug)]
struct Variant {
    url: String,
    width: u32,
}

/// Turns raw image attributes into absolute, deduplicated, largest-first URLs
pub struct ImageResolver {
    base_url: String,
    name_pattern: Regex,
}

impl ImageResolver {
    pub fn new(base_url: &str) -> Result<Self> {
        let name_pattern =
            Regex::new(IMAGE_NAME_PATTERN).context("Failed to compile image name pattern")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            name_pattern,
        })
    }

    /// Absolutize one candidate. Returns `None` for inline data and anything that
    /// does not end up as an http(s) URL.
    pub fn normalize(&self, raw: &str, upgrade_http: bool) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with("data:") {
            return None;
        }

        let url = if raw.starts_with("//") {
            format!("https:{}", raw)
        } else if raw.starts_with('/') {
            format!("{}{}", self.base_url, raw)
        } else if upgrade_http && raw.starts_with("http://") {
            raw.replacen("http://", "https://", 1)
        } else {
            raw.to_string()
        };

        url.starts_with("http").then_some(url)
    }

    /// Normalize every candidate from one source, then collapse resolutions
    pub fn resolve(&self, candidates: &[String], upgrade_http: bool) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        for candidate in candidates {
            if let Some(url) = self.normalize(candidate, upgrade_http) {
                if !urls.contains(&url) {
                    urls.push(url);
                }
            }
        }

        self.dedupe(&urls)
    }

    /// Keep the widest variant of each photo, widest photos first.
    /// Ties keep first-seen order.
    pub fn dedupe(&self, urls: &[String]) -> Vec<String> {
        let mut variants: Vec<Variant> = Vec::new();
        let mut index: HashMap<PhotoKey, usize> = HashMap::new();

        for url in urls {
            let (key, width) = self.photo_key(url);
            match index.get(&key) {
                Some(&slot) => {
                    if variants[slot].width < width {
                        variants[slot] = Variant {
                            url: url.clone(),
                            width,
                        };
                    }
                }
                None => {
                    index.insert(key, variants.len());
                    variants.push(Variant {
                        url: url.clone(),
                        width,
                    });
                }
            }
        }

        variants.sort_by(|a, b| b.width.cmp(&a.width));
        variants.into_iter().map(|v| v.url).collect()
    }

    fn photo_key(&self, url: &str) -> (PhotoKey, u32) {
        let path = url.split('?').next().unwrap_or(url);

        match self.name_pattern.captures(path) {
            Some(caps) => {
                let width = caps
                    .get(3)
                    .and_then(|w| w.as_str().parse().ok())
                    .unwrap_or(0);
                (PhotoKey::Named(caps[1].to_string()), width)
            }
            None => (PhotoKey::Opaque(url.to_string()), 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ImageResolver {
        ImageResolver::new("https://shop.test").unwrap()
    }

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalizes_relative_forms() {
        let r = resolver();
        assert_eq!(
            r.normalize("//cdn.shop.test/a.jpg", false).as_deref(),
            Some("https://cdn.shop.test/a.jpg")
        );
        assert_eq!(
            r.normalize("/files/a.jpg", false).as_deref(),
            Some("https://shop.test/files/a.jpg")
        );
        assert_eq!(
            r.normalize("http://shop.test/a.jpg", false).as_deref(),
            Some("http://shop.test/a.jpg")
        );
        assert_eq!(
            r.normalize("http://shop.test/a.jpg", true).as_deref(),
            Some("https://shop.test/a.jpg")
        );
        assert_eq!(r.normalize("data:image/png;base64,AAAA", false), None);
        assert_eq!(r.normalize("a.jpg", false), None);
    }

    #[test]
    fn keeps_widest_variant_per_photo() {
        let out = resolver().dedupe(&urls(&[
            "https://cdn.test/files/watch_400x400.jpg?v=1",
            "https://cdn.test/files/watch_1800x1800.jpg?v=1",
            "https://cdn.test/files/watch.jpg?v=1",
            "https://cdn.test/files/dial_800x800.jpg",
        ]));

        assert_eq!(
            out,
            urls(&[
                "https://cdn.test/files/watch_1800x1800.jpg?v=1",
                "https://cdn.test/files/dial_800x800.jpg",
            ])
        );
    }

    #[test]
    fn width_only_suffix_counts_as_width() {
        let out = resolver().dedupe(&urls(&[
            "https://cdn.test/files/case_300x.png",
            "https://cdn.test/files/case_1800x.png",
        ]));
        assert_eq!(out, urls(&["https://cdn.test/files/case_1800x.png"]));
    }

    #[test]
    fn unrecognized_urls_sort_with_zero_width() {
        let out = resolver().dedupe(&urls(&[
            "https://cdn.test/render?id=7",
            "https://cdn.test/files/strap.webp",
            "https://cdn.test/files/clasp_640x480.jpeg",
            "https://cdn.test/render?id=7",
        ]));

        assert_eq!(
            out,
            urls(&[
                "https://cdn.test/files/clasp_640x480.jpeg",
                "https://cdn.test/render?id=7",
                "https://cdn.test/files/strap.webp",
            ])
        );
    }

    #[test]
    fn resolve_drops_inline_data_and_duplicates() {
        let out = resolver().resolve(
            &urls(&[
                "data:image/gif;base64,R0lGOD",
                "//cdn.test/files/a_100x100.jpg",
                "//cdn.test/files/a_100x100.jpg",
                "//cdn.test/files/b.jpg",
            ]),
            false,
        );
        assert_eq!(
            out,
            urls(&["https://cdn.test/files/a_100x100.jpg", "https://cdn.test/files/b.jpg"])
        );
    }

    #[test]
    fn no_two_outputs_share_a_photo() {
        let r = resolver();
        let input = urls(&[
            "https://cdn.test/x_100x100.jpg",
            "https://cdn.test/y_200x200.jpg",
            "https://cdn.test/x_900x900.jpg",
            "https://cdn.test/y.jpg",
            "https://cdn.test/x_500x500.jpg",
        ]);
        let out = r.dedupe(&input);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0], "https://cdn.test/x_900x900.jpg");
        assert_eq!(out[1], "https://cdn.test/y_200x200.jpg");
    }
}
