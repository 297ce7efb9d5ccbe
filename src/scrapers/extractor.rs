use crate::models::{Condition, ProductRecord, YEAR_RANGE};
use crate::scrapers::images::ImageResolver;
use crate::scrapers::types::{
    SiteProfile, AMOUNT_PATTERN, BOX_WORDS, CURRENCY_PATTERN, FULL_SET_PHRASES, NEW_WITH_YEAR_PATTERN,
    NEW_WORDS, PAPER_WORDS, REFERENCE_PATTERNS, THOUSANDS_SEPARATORS, UNWORN_PHRASES, WORN_PHRASES,
    YEAR_PATTERNS,
};
use crate::scrapers::{element_text, parse_selector};
use anyhow::{Context, Result};
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

/// Ordered regex rules. The first rule that matches supplies capture group 1.
#[derive(Debug)]
pub struct RuleChain {
    rules: Vec<Regex>,
}

impl RuleChain {
    pub fn compile(patterns: &[&str]) -> Result<Self> {
        let rules = patterns
            .iter()
            .map(|p| Regex::new(p).with_context(|| format!("Failed to compile pattern {}", p)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn first_capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.rules
            .iter()
            .find_map(|rule| rule.captures(text))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Condition state while scanning description lines.
/// A bare "new" is only tentative: worn/used language on any later line replaces it.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ConditionReading {
    Unset,
    Tentative,
    Settled(Condition),
}

struct Selectors {
    title: Selector,
    vendor: Selector,
    price: Selector,
    description: Selector,
    description_lines: Selector,
    zoom_image: Selector,
    og_image: Selector,
    gallery_image: Selector,
}

/// Best-effort extraction of a listing from a product detail page
pub struct FieldExtractor {
    profile: SiteProfile,
    selectors: Selectors,
    reference_rules: RuleChain,
    year_rules: RuleChain,
    new_with_year: Regex,
    currency: Regex,
    amount: Regex,
    images: ImageResolver,
}

impl FieldExtractor {
    pub fn new(profile: SiteProfile) -> Result<Self> {
        let s = &profile.selectors;
        let selectors = Selectors {
            title: parse_selector(&s.title)?,
            vendor: parse_selector(&s.vendor)?,
            price: parse_selector(&s.price)?,
            description: parse_selector(&s.description)?,
            description_lines: parse_selector(&s.description_lines)?,
            zoom_image: parse_selector(&s.zoom_image)?,
            og_image: parse_selector(&s.og_image)?,
            gallery_image: parse_selector(&s.gallery_image)?,
        };

        Ok(Self {
            reference_rules: RuleChain::compile(REFERENCE_PATTERNS)?,
            year_rules: RuleChain::compile(YEAR_PATTERNS)?,
            new_with_year: Regex::new(NEW_WITH_YEAR_PATTERN)?,
            currency: Regex::new(CURRENCY_PATTERN)?,
            amount: Regex::new(AMOUNT_PATTERN)?,
            images: ImageResolver::new(&profile.base_url)?,
            selectors,
            profile,
        })
    }

    /// Build a record from the page HTML. Never fails: missing markup leaves fields empty.
    pub fn extract(&self, html: &str, page_url: &str) -> ProductRecord {
        let document = Html::parse_document(html);
        let mut record = ProductRecord::blank(
            page_url,
            &self.profile.default_currency,
            &self.profile.location,
        );

        if let Some(title) = document.select(&self.selectors.title).next() {
            record.model = element_text(title).trim().to_string();
        }

        if let Some(vendor) = document.select(&self.selectors.vendor).next() {
            let vendor = element_text(vendor).trim().to_string();
            if !vendor.is_empty() && !self.is_store_name(&vendor) {
                record.brand = vendor;
            } else {
                debug!("Ignoring vendor tag '{}' on {}", vendor, page_url);
            }
        }

        if let Some(price) = document.select(&self.selectors.price).next() {
            self.apply_price(element_text(price).trim(), &mut record);
        }

        let mut condition = ConditionReading::Unset;
        for line in self.description_lines(&document) {
            self.scan_line(&line, &mut record, &mut condition);
        }

        record.condition = match condition {
            ConditionReading::Settled(c) => c,
            ConditionReading::Tentative => Condition::Unworn,
            ConditionReading::Unset => self.condition_from_title(&record.model),
        };

        if record.brand.is_empty() {
            record.brand = self.brand_from_model(&record.model);
        }

        record.images = self.collect_images(&document);

        record
    }

    fn is_store_name(&self, vendor: &str) -> bool {
        let vendor = vendor.to_lowercase();
        self.profile
            .store_keywords
            .iter()
            .any(|k| vendor.contains(&k.to_lowercase()))
    }

    fn apply_price(&self, text: &str, record: &mut ProductRecord) {
        if let Some(caps) = self.currency.captures(text) {
            record.currency = caps[1].to_string();
        }

        if let Some(caps) = self.amount.captures(text) {
            let digits: String = caps[1]
                .chars()
                .filter(|c| !THOUSANDS_SEPARATORS.contains(c))
                .collect();
            record.price = leading_float(&digits)
                .filter(|p| p.is_finite() && *p >= 0.0)
                .unwrap_or(0.0);
        }
    }

    /// Paragraphs of the description, or its raw text split into lines when it has none
    fn description_lines(&self, document: &Html) -> Vec<String> {
        let Some(container) = document.select(&self.selectors.description).next() else {
            return Vec::new();
        };

        let paragraphs: Vec<String> = container
            .select(&self.selectors.description_lines)
            .map(|p| element_text(p).trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();

        if !paragraphs.is_empty() {
            return paragraphs;
        }

        element_text(container)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }

    fn scan_line(&self, line: &str, record: &mut ProductRecord, condition: &mut ConditionReading) {
        let lower = line.to_lowercase();

        if record.reference_number.is_empty() {
            if let Some(reference) = self.reference_rules.first_capture(line) {
                record.reference_number = reference.trim().to_string();
            }
        }

        if record.year.is_none() {
            record.year = self
                .year_rules
                .first_capture(line)
                .and_then(|y| y.parse::<i32>().ok())
                .filter(|y| YEAR_RANGE.contains(y));
        }

        *condition = self.read_condition(line, &lower, *condition);

        if contains_any(&lower, FULL_SET_PHRASES) {
            record.original_box = Some(true);
            record.original_paper = Some(true);
        }
        if contains_any(&lower, BOX_WORDS) {
            record.original_box = Some(true);
        }
        if contains_any(&lower, PAPER_WORDS) {
            record.original_paper = Some(true);
        }
    }

    fn read_condition(&self, line: &str, lower: &str, current: ConditionReading) -> ConditionReading {
        if let ConditionReading::Settled(_) = current {
            return current;
        }

        let mut reading = current;
        if contains_any(lower, UNWORN_PHRASES) {
            reading = ConditionReading::Settled(Condition::Unworn);
        } else if contains_any(lower, NEW_WORDS) && !self.new_with_year.is_match(line) {
            reading = ConditionReading::Tentative;
        }

        // Worn language overrides whatever the line said before, "unworn" included
        if contains_any(lower, WORN_PHRASES) {
            reading = ConditionReading::Settled(Condition::Worn);
        }

        reading
    }

    fn condition_from_title(&self, title: &str) -> Condition {
        let lower = title.to_lowercase();
        if contains_any(&lower, NEW_WORDS) && !self.new_with_year.is_match(title) {
            Condition::Unworn
        } else {
            Condition::Unknown
        }
    }

    fn brand_from_model(&self, model: &str) -> String {
        let lower = model.to_lowercase();
        self.profile
            .known_brands
            .iter()
            .find(|brand| lower.contains(&brand.to_lowercase()))
            .cloned()
            .unwrap_or_else(|| model.split_whitespace().next().unwrap_or("").to_string())
    }

    /// Zoom attributes, then Open Graph tags, then gallery images; first non-empty source wins
    fn collect_images(&self, document: &Html) -> Vec<String> {
        let s = &self.profile.selectors;

        let zoom: Vec<String> = document
            .select(&self.selectors.zoom_image)
            .filter_map(|img| img.value().attr(&s.zoom_attr))
            .map(String::from)
            .collect();
        let images = self.images.resolve(&zoom, false);
        if !images.is_empty() {
            return images;
        }

        let og: Vec<String> = document
            .select(&self.selectors.og_image)
            .filter_map(|meta| meta.value().attr("content"))
            .map(String::from)
            .collect();
        let images = self.images.resolve(&og, true);
        if !images.is_empty() {
            return images;
        }

        let gallery: Vec<String> = document
            .select(&self.selectors.gallery_image)
            .filter_map(|img| {
                s.gallery_attrs
                    .iter()
                    .filter_map(|attr| img.value().attr(attr))
                    .find(|value| !value.trim().is_empty())
            })
            .map(|src| src.replace(&self.profile.width_placeholder, &self.profile.gallery_width))
            .collect();
        self.images.resolve(&gallery, false)
    }
}

/// Longest prefix that reads as a decimal number: "12.500.00" gives 12.5
fn leading_float(digits: &str) -> Option<f64> {
    let end = digits
        .match_indices('.')
        .nth(1)
        .map_or(digits.len(), |(i, _)| i);
    digits[..end].parse().ok()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
