use std::time::Duration;

/// Brands recognized in a product title when the page carries no usable vendor tag.
/// Scanned in order; the first case-insensitive substring hit wins.
pub const WATCH_BRANDS: &[&str] = &[
    "Rolex",
    "Cartier",
    "Omega",
    "Patek Philippe",
    "Audemars Piguet",
    "Breitling",
    "IWC",
    "Tudor",
    "Tag Heuer",
    "Hublot",
    "Panerai",
    "Vacheron Constantin",
    "Jaeger-LeCoultre",
    "Blancpain",
    "A. Lange & Söhne",
    "Franck Muller",
    "Richard Mille",
    "Bulgari",
    "Chopard",
    "Piaget",
    "Zenith",
    "Girard-Perregaux",
    "Montblanc",
    "Baume & Mercier",
];

/// Reference number rules, most trustworthy first
pub const REFERENCE_PATTERNS: &[&str] = &[
    r"(?i)(?:Ref(?:erence|érence)?\.?|Référence)\s*[:#-]?\s*([A-Z0-9\-]+)",
    r"(?i)Ref(?:erence|érence)?\s+([A-Z0-9\-]+)",
];

/// Year rules, most trustworthy first. The first pattern that matches decides.
pub const YEAR_PATTERNS: &[&str] = &[
    r"(?i)(?:New|Year|Nouveau|Annee|Année)[^\d]*(\d{4})",
    r"\b(\d{4})\b",
];

/// A "new" word directly followed by a year is a release-year annotation, not a condition
pub const NEW_WITH_YEAR_PATTERN: &str = r"(?i)\b(?:new|nouveau|neuve)\s+\d{4}";

pub const CURRENCY_PATTERN: &str = r"([A-Z]{3})";
pub const AMOUNT_PATTERN: &str = r"(\d[\d,.'’]*)";
/// Characters used as thousands separators in printed prices
pub const THOUSANDS_SEPARATORS: &[char] = &[',', '\'', '’'];

/// `name(_WxH)?.ext`, matched against a URL with its query string removed
pub const IMAGE_NAME_PATTERN: &str = r"(?i)^(.+?)(_(\d+)x(\d*))?\.(jpg|jpeg|png|webp)$";

pub const UNWORN_PHRASES: &[&str] = &["never worn", "unworn"];
pub const NEW_WORDS: &[&str] = &["new", "neuve"];
pub const WORN_PHRASES: &[&str] = &["very good", "très bon", "occasion", "used", "porté", "worn"];
pub const FULL_SET_PHRASES: &[&str] = &["full set"];
pub const BOX_WORDS: &[&str] = &["box", "boîte"];
pub const PAPER_WORDS: &[&str] = &["paper", "certificate", "papier", "certificat", "card", "carte"];

/// CSS selectors matching the storefront markup
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    pub title: String,
    pub vendor: String,
    pub price: String,
    pub description: String,
    /// Paragraph-level children of the description container
    pub description_lines: String,
    pub zoom_image: String,
    pub zoom_attr: String,
    pub og_image: String,
    pub gallery_image: String,
    /// Attributes tried in order on each gallery image
    pub gallery_attrs: Vec<String>,
    pub product_link: String,
    pub fallback_link: String,
    /// Substring a fallback link must contain to count as a product page
    pub product_path_marker: String,
    pub next_page: String,
}

/// Everything specific to the scraped storefront
#[derive(Debug, Clone)]
pub struct SiteProfile {
    /// Origin used to absolutize root-relative links and images
    pub base_url: String,
    pub referer: String,
    pub selectors: SiteSelectors,
    /// A vendor tag containing any of these is the shop itself, not a brand
    pub store_keywords: Vec<String>,
    pub known_brands: Vec<String>,
    pub default_currency: String,
    pub location: String,
    pub width_placeholder: String,
    pub gallery_width: String,
    pub page_delay: Duration,
    pub batch_delay: Duration,
    pub batch_size: usize,
    pub max_pages: usize,
    pub request_timeout: Duration,
}

impl SiteProfile {
    /// Profile for the Daniel de Guy Shopify storefront
    pub fn daniel_de_guy() -> Self {
        Self {
            base_url: "https://www.danieldeguy.com".to_string(),
            referer: "https://www.danieldeguy.com/collections/montres-occasion-marques".to_string(),
            selectors: SiteSelectors {
                title: ".product-single__title".to_string(),
                vendor: ".product-single__vendor".to_string(),
                price: ".product-single__meta .product__price, .product__price".to_string(),
                description: ".product-single__description".to_string(),
                description_lines: "p".to_string(),
                zoom_image: "img[data-photoswipe-src]".to_string(),
                zoom_attr: "data-photoswipe-src".to_string(),
                og_image: r#"meta[property="og:image"]"#.to_string(),
                gallery_image:
                    ".product__photos img, .product-single__photos img, .product-image-main img"
                        .to_string(),
                gallery_attrs: ["data-photoswipe-src", "data-src", "src", "data-zoom"]
                    .iter()
                    .map(|a| a.to_string())
                    .collect(),
                product_link: ".grid-product__link".to_string(),
                fallback_link: ".grid-product__content a".to_string(),
                product_path_marker: "/products/".to_string(),
                next_page: ".pagination .next a".to_string(),
            },
            store_keywords: vec!["daniel".to_string(), "guy".to_string()],
            known_brands: WATCH_BRANDS.iter().map(|b| b.to_string()).collect(),
            default_currency: "CHF".to_string(),
            location: "Switzerland".to_string(),
            width_placeholder: "{width}".to_string(),
            gallery_width: "1800".to_string(),
            page_delay: Duration::from_millis(2000),
            batch_delay: Duration::from_millis(2000),
            batch_size: 10,
            max_pages: 200,
            request_timeout: Duration::from_secs(60),
        }
    }

    /// Same profile rooted at a different origin
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Disable the courtesy pauses between pages and batches
    pub fn without_delays(mut self) -> Self {
        self.page_delay = Duration::ZERO;
        self.batch_delay = Duration::ZERO;
        self
    }
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self::daniel_de_guy()
    }
}
