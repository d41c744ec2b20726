//! Data models for scraped Steam search results.

use serde::{Deserialize, Serialize};

/// One search-result entry as scraped from a regional storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawListing {
    /// Listing title as displayed.
    pub title: String,
    /// Price text, one price per line (standard first, discounted second).
    pub price_text: String,
}

impl RawListing {
    /// Creates a listing.
    pub fn new(title: impl Into<String>, price_text: impl Into<String>) -> Self {
        Self { title: title.into(), price_text: price_text.into() }
    }
}

/// Listings parsed from one search page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// Search term used
    pub term: String,
    /// Region searched
    pub region: String,
    /// Listings in page order
    pub listings: Vec<RawListing>,
}

impl SearchResults {
    /// Creates empty search results.
    pub fn new(term: impl Into<String>, region: impl Into<String>) -> Self {
        Self { term: term.into(), region: region.into(), listings: Vec::new() }
    }

    /// Returns the listing titles in page order.
    pub fn titles(&self) -> Vec<&str> {
        self.listings.iter().map(|l| l.title.as_str()).collect()
    }

    /// Returns number of listings.
    pub fn count(&self) -> usize {
        self.listings.len()
    }

    /// Returns true if nothing was found.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}
