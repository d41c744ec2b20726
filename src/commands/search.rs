//! Search command implementation.

use crate::commands::compare::fetch_listings;
use crate::config::Config;
use crate::format::{Formatter, ListingRow};
use crate::matching::TitleNormalizer;
use crate::pricing::{clean_price, parse_price_block};
use crate::steam::{Region, SteamClient, StoreSearch};
use anyhow::{Context, Result};
use tracing::info;

/// Lists one storefront's search results with normalized titles and cleaned prices.
pub struct SearchCommand {
    config: Config,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the search and returns formatted output.
    pub async fn execute(&self, term: &str, region: Region) -> Result<String> {
        let client = SteamClient::new(&self.config).await.context("Failed to create HTTP client")?;

        self.execute_with_client(&client, term, region).await
    }

    /// Executes the search with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl StoreSearch,
        term: &str,
        region: Region,
    ) -> Result<String> {
        let normalizer =
            TitleNormalizer::new(&self.config.noise_tokens).context("Invalid noise token list")?;

        let listings = fetch_listings(client, term, region).await?;
        info!("Found {} listings for '{}' in {}", listings.len(), term, region.name());

        let rows: Vec<ListingRow> = listings
            .into_iter()
            .map(|listing| {
                let tiers = parse_price_block(&listing.price_text);
                ListingRow {
                    normalized: normalizer.normalize(&listing.title),
                    standard: clean_price(&tiers.standard, region, false),
                    discount: clean_price(&tiers.discount, region, true),
                    title: listing.title,
                }
            })
            .collect();

        let formatter =
            Formatter::new(self.config.format, self.config.home_region, self.config.foreign_region);
        Ok(formatter.format_listings(region, &rows))
    }
}
