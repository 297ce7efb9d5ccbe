use serde::{Deserialize, Serialize};

/// Lowest and highest year accepted as a production/purchase year
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2100;

/// Condition of the watch as stated by the seller
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Unworn,
    Worn,
    #[default]
    Unknown,
}

/// One listing scraped from a product detail page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub brand: String,
    pub model: String,
    pub reference_number: String,
    pub year: Option<i32>,
    pub price: f64,
    pub currency: String,
    /// `None` when the listing says nothing about the box
    pub original_box: Option<bool>,
    pub original_paper: Option<bool>,
    pub condition: Condition,
    pub location: String,
    pub images: Vec<String>,
    pub source_url: String,
}

impl ProductRecord {
    /// Empty record for a detail page, before any field has been extracted
    pub fn blank(source_url: &str, currency: &str, location: &str) -> Self {
        Self {
            brand: String::new(),
            model: String::new(),
            reference_number: String::new(),
            year: None,
            price: 0.0,
            currency: currency.to_string(),
            original_box: None,
            original_paper: None,
            condition: Condition::Unknown,
            location: location.to_string(),
            images: Vec::new(),
            source_url: source_url.to_string(),
        }
    }
}
