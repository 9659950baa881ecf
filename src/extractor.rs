use chrono::Utc;
use scraper::ElementRef;
use tracing::{debug, warn};
use url::Url;

use crate::filter::KeywordFilter;
use crate::models::{ListingRecord, NOT_AVAILABLE};
use crate::selectors::FieldChain;
use crate::Result;

pub const TITLE_SELECTOR: &str = r#"span._2poNJ[data-aut-id="itemTitle"]"#;

pub const PRICE_SELECTORS: &[&str] = &[
    r#"span._2Ks63[data-aut-id="itemPrice"]"#,
    r#"span[data-aut-id="itemPrice"]"#,
];

pub const LOCATION_SELECTORS: &[&str] = &[
    r#"span._2VQu4[data-aut-id="item-location"]"#,
    r#"span[data-aut-id="item-location"]"#,
];

pub const LINK_SELECTORS: &[&str] = &[
    r#"a[href*="/item/"]"#,
    "a._2cbZ2",
    r#"a[data-aut-id="itemLink"]"#,
    "a",
];

pub const IMAGE_SELECTORS: &[&str] = &[
    "img._3vnjf",
    r#"img[src*="apollo.olx.in"]"#,
    r#"img[src*="olx.in"]"#,
    "img",
];

pub const POSTED_DATE_SELECTORS: &[&str] = &[
    "div._3rmDx span._2jcGx",
    r#"span[data-aut-id="item-date"]"#,
];

/// Turn an href into an absolute link on `base`.
pub fn normalize_link(base: &str, href: &str) -> String {
    let base = base.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{}{}", base, href)
    } else if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}/{}", base, href)
    }
}

/// Derives `ListingRecord`s from listing blocks.
pub struct ListingExtractor {
    base_url: String,
    keywords: KeywordFilter,
    title: FieldChain,
    price: FieldChain,
    location: FieldChain,
    link: FieldChain,
    image_url: FieldChain,
    posted_date: FieldChain,
}

impl ListingExtractor {
    pub fn new(base_url: &str, keywords: KeywordFilter) -> Result<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            keywords,
            title: FieldChain::texts(&[TITLE_SELECTOR])?,
            price: FieldChain::texts(PRICE_SELECTORS)?,
            location: FieldChain::texts(LOCATION_SELECTORS)?,
            link: FieldChain::attrs(LINK_SELECTORS, "href")?,
            image_url: FieldChain::attrs(IMAGE_SELECTORS, "src")?,
            posted_date: FieldChain::texts(POSTED_DATE_SELECTORS)?,
        })
    }

    /// The block's title text, if it has a non-empty title element.
    pub fn title_of(&self, block: &ElementRef<'_>) -> Option<String> {
        self.title.extract(block)
    }

    /// A record for the block, or `None` if its title does not match the
    /// keyword list. Every other field falls back to the sentinel on its own.
    pub fn extract_record(&self, block: &ElementRef<'_>) -> Option<ListingRecord> {
        let title = self
            .title_of(block)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        if !self.keywords.matches(&title) {
            debug!(title = title.as_str(), "Skipping listing without a keyword match");
            return None;
        }

        let link = match self.link.extract(block) {
            Some(href) => {
                let link = normalize_link(&self.base_url, &href);
                if let Err(e) = Url::parse(&link) {
                    warn!(href = href.as_str(), "Listing link does not parse as a URL: {}", e);
                }
                link
            }
            None => NOT_AVAILABLE.to_string(),
        };

        let or_sentinel = |value: Option<String>| value.unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Some(ListingRecord {
            title,
            price: or_sentinel(self.price.extract(block)),
            location: or_sentinel(self.location.extract(block)),
            link,
            image_url: or_sentinel(self.image_url.extract(block)),
            posted_date: or_sentinel(self.posted_date.extract(block)),
            scraped_at: Utc::now(),
        })
    }
}
