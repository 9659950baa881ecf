use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stands in for any field that could not be located in a listing block.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingRecord {
    pub title: String,
    pub price: String,
    pub location: String,
    pub link: String,
    pub image_url: String,
    pub posted_date: String,
    pub scraped_at: DateTime<Utc>,
}

impl ListingRecord {
    /// A record with every field set to the sentinel, stamped now.
    pub fn unavailable() -> Self {
        Self {
            title: NOT_AVAILABLE.to_string(),
            price: NOT_AVAILABLE.to_string(),
            location: NOT_AVAILABLE.to_string(),
            link: NOT_AVAILABLE.to_string(),
            image_url: NOT_AVAILABLE.to_string(),
            posted_date: NOT_AVAILABLE.to_string(),
            scraped_at: Utc::now(),
        }
    }
}

/// Records kept by one scrape, in discovery order. Append-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    records: Vec<ListingRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ListingRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ListingRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[ListingRecord] {
        &self.records
    }
}

impl FromIterator<ListingRecord> for ResultSet {
    fn from_iter<I: IntoIterator<Item = ListingRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ListingRecord;
    type IntoIter = std::slice::Iter<'a, ListingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
