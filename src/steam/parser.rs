//! HTML parser for Steam store search pages.

use crate::steam::models::{RawListing, SearchResults};
use crate::steam::regions::Region;
use crate::steam::selectors::{errors, search};
use anyhow::Result;
use scraper::{ElementRef, Html};
use tracing::{debug, trace};

/// Parser for Steam search result pages.
pub struct Parser {
    region: Region,
}

impl Parser {
    /// Creates a new parser for the given region.
    pub fn new(region: Region) -> Self {
        Self { region }
    }

    /// Parses a search page into listings, in page order.
    ///
    /// Rows without a title are skipped. Rows without a price keep an empty price text,
    /// which later cleans to unavailable.
    pub fn parse_search(&self, html: &str, term: &str) -> Result<SearchResults> {
        let document = Html::parse_document(html);

        self.check_for_errors(&document)?;

        let mut results = SearchResults::new(term, self.region.to_string());

        for row in document.select(&search::RESULT) {
            match parse_row(row) {
                Some(listing) => {
                    trace!("Parsed listing: {} - {:?}", listing.title, listing.price_text);
                    results.listings.push(listing);
                }
                None => trace!("Skipping result row without title"),
            }
        }

        debug!("Parsed {} listings for '{}' in {}", results.count(), term, self.region.name());

        Ok(results)
    }

    fn check_for_errors(&self, document: &Html) -> Result<()> {
        if document.select(&errors::AGE_GATE).next().is_some() {
            anyhow::bail!("Steam returned an age check page instead of search results.");
        }

        if let Some(error) = document.select(&errors::ERROR_BOX).next() {
            anyhow::bail!("Steam returned an error page: {}", element_text(error));
        }

        Ok(())
    }
}

fn parse_row(row: ElementRef) -> Option<RawListing> {
    let title = row.select(&search::TITLE).next().map(element_text)?;
    if title.is_empty() {
        return None;
    }

    Some(RawListing { title, price_text: price_text(row) })
}

/// Collects the row's prices, one per line, pre-discount price first.
fn price_text(row: ElementRef) -> String {
    if let Some(current) = row.select(&search::PRICE_FINAL).next() {
        let current = element_text(current);

        return match row.select(&search::PRICE_ORIGINAL).next().map(element_text) {
            Some(original) if !original.is_empty() => format!("{}\n{}", original, current),
            _ => current,
        };
    }

    row.select(&search::PRICE_LEGACY)
        .next()
        .map(|container| {
            container
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
