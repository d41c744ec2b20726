//! Compare command implementation.

use crate::comparator::{Comparator, ComparisonRecord};
use crate::config::Config;
use crate::export;
use crate::format::Formatter;
use crate::matching::Matcher;
use crate::observer::TracingObserver;
use crate::steam::{Parser, RawListing, Region, SteamClient, StoreSearch};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Compares game prices between the home and foreign storefronts.
pub struct CompareCommand {
    config: Config,
}

impl CompareCommand {
    /// Creates a new compare command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the comparison and returns formatted output.
    pub async fn execute(&self, games: &[String]) -> Result<String> {
        let client = SteamClient::new(&self.config).await.context("Failed to create HTTP client")?;

        self.execute_with_client(&client, games).await
    }

    /// Executes the comparison with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl StoreSearch,
        games: &[String],
    ) -> Result<String> {
        let records = self.collect(client, games).await?;

        if let Some(path) = &self.config.output {
            let (home, foreign) = (self.config.home_region, self.config.foreign_region);
            export::write_report(path, &records, home, foreign)?;
        }

        let formatter =
            Formatter::new(self.config.format, self.config.home_region, self.config.foreign_region);
        Ok(formatter.format_records(&records))
    }

    /// Compares each game in order and returns the records of games found in the home
    /// storefront.
    ///
    /// The foreign storefront is only searched after a home match. A failed home fetch
    /// skips the game; a failed foreign fetch leaves the foreign columns unavailable.
    pub async fn collect(
        &self,
        client: &impl StoreSearch,
        games: &[String],
    ) -> Result<Vec<ComparisonRecord>> {
        let comparator = self.comparator()?;
        let home = self.config.home_region;
        let foreign = self.config.foreign_region;

        let games: Vec<&str> = games.iter().map(|g| g.trim()).filter(|g| !g.is_empty()).collect();
        let mut records = Vec::new();

        for (idx, game) in games.iter().enumerate() {
            info!("[{}/{}] Fetching prices for '{}'", idx + 1, games.len(), game);

            let home_listings = match fetch_listings(client, game, home).await {
                Ok(listings) => listings,
                Err(e) => {
                    warn!("Failed to search '{}' in {}: {:#}", game, home.name(), e);
                    continue;
                }
            };

            let Some(matched) = comparator.match_home(game, &home_listings) else {
                continue;
            };

            let foreign_listings = fetch_listings(client, game, foreign).await.unwrap_or_else(|e| {
                warn!("Failed to search '{}' in {}: {:#}", game, foreign.name(), e);
                Vec::new()
            });

            records.push(comparator.complete(matched, &foreign_listings));
        }

        info!("Compared {} of {} games", records.len(), games.len());
        Ok(records)
    }

    fn comparator(&self) -> Result<Comparator> {
        let matcher =
            Matcher::new(&self.config.match_settings()).context("Invalid noise token list")?;

        Ok(Comparator::new(
            matcher,
            self.config.home_region,
            self.config.foreign_region,
            self.config.conversion_rate,
        )
        .with_observer(Arc::new(TracingObserver)))
    }
}

/// Fetches and parses one storefront's search page.
pub(crate) async fn fetch_listings(
    client: &impl StoreSearch,
    term: &str,
    region: Region,
) -> Result<Vec<RawListing>> {
    let html = client.search(term, region).await?;
    let results = Parser::new(region).parse_search(&html, term)?;
    Ok(results.listings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Mock storefront serving canned pages per (term, region).
    #[derive(Default)]
    struct MockStore {
        pages: HashMap<(String, Region), String>,
        failing: Vec<Region>,
        calls: Mutex<Vec<(String, Region)>>,
    }

    impl MockStore {
        fn page(mut self, term: &str, region: Region, rows: &[(&str, &str)]) -> Self {
            self.pages.insert((term.to_string(), region), make_search_html(rows));
            self
        }

        fn failing(mut self, region: Region) -> Self {
            self.failing.push(region);
            self
        }

        fn calls(&self) -> Vec<(String, Region)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StoreSearch for MockStore {
        async fn search(&self, term: &str, region: Region) -> Result<String> {
            self.calls.lock().unwrap().push((term.to_string(), region));
            if self.failing.contains(&region) {
                anyhow::bail!("Request failed with status: 500 Internal Server Error");
            }
            Ok(self
                .pages
                .get(&(term.to_string(), region))
                .cloned()
                .unwrap_or_else(|| "<html></html>".to_string()))
        }
    }

    fn make_search_html(rows: &[(&str, &str)]) -> String {
        let mut html = String::from("<html><body><div id=\"search_resultsRows\">");
        for (title, price) in rows {
            html.push_str(&format!(
                r#"<a class="search_result_row"><span class="title">{}</span>
                   <div class="discount_block">
                   <div class="discount_final_price">{}</div></div></a>"#,
                title, price
            ));
        }
        html.push_str("</div></body></html>");
        html
    }

    fn make_test_config() -> Config {
        Config { delay_ms: 0, delay_jitter_ms: 0, ..Config::default() }
    }

    fn games(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_compare_half_life() {
        let client = MockStore::default()
            .page(
                "Half-Life II",
                Region::In,
                &[
                    ("Half-Life", "₹ 199"),
                    ("Half-Life 2", "₹ 999"),
                    ("Half-Life 2: Episode One", "₹ 299"),
                ],
            )
            .page("Half-Life II", Region::Ua, &[("Half-Life 2", "49900₴")]);

        let cmd = CompareCommand::new(make_test_config());
        let records = cmd.collect(&client, &games(&["Half-Life II"])).await.unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.product_name, "Half-Life II");
        assert_eq!(record.standard_price_home.to_string(), "9.99");
        assert_eq!(record.standard_price_foreign.to_string(), "499.00");
        assert_eq!(record.standard_price_foreign_converted.to_string(), "1012.97");
        assert_eq!(record.difference_standard.to_string(), "-1002.98");
    }

    #[tokio::test]
    async fn test_home_miss_skips_foreign_fetch() {
        let client = MockStore::default().page("Portal", Region::Ua, &[("Portal", "₴100")]);

        let cmd = CompareCommand::new(make_test_config());
        let records = cmd.collect(&client, &games(&["Portal"])).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(client.calls(), vec![("Portal".to_string(), Region::In)]);
    }

    #[tokio::test]
    async fn test_home_fetch_failure_skips_game() {
        let client = MockStore::default()
            .page("Portal", Region::Ua, &[("Portal", "₴100")])
            .failing(Region::In);

        let cmd = CompareCommand::new(make_test_config());
        let records = cmd.collect(&client, &games(&["Portal", "Hades"])).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(client.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_foreign_fetch_failure_degrades() {
        let client = MockStore::default()
            .page("Portal", Region::In, &[("Portal", "₹ 199")])
            .failing(Region::Ua);

        let cmd = CompareCommand::new(make_test_config());
        let records = cmd.collect(&client, &games(&["Portal"])).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].standard_price_home.to_string(), "1.99");
        assert!(records[0].standard_price_foreign.is_unavailable());
        assert!(records[0].difference_discount.is_unavailable());
    }

    #[tokio::test]
    async fn test_blank_games_ignored_and_order_kept() {
        let client = MockStore::default()
            .page("Hades", Region::In, &[("Hades", "₹ 2,500")])
            .page("Hades", Region::Ua, &[("Hades", "₴ 999")])
            .page("Celeste", Region::In, &[("Celeste", "₹ 1,000")]);

        let cmd = CompareCommand::new(make_test_config());
        let input = games(&[" Hades ", "", "  ", "Celeste"]);
        let records = cmd.collect(&client, &input).await.unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.product_name.as_str()).collect();
        assert_eq!(names, vec!["Hades", "Celeste"]);
        assert_eq!(records[0].difference_standard.to_string(), "4.72");
    }

    #[tokio::test]
    async fn test_swapped_regions() {
        let client = MockStore::default()
            .page("Hades", Region::Ua, &[("Hades", "₴ 999")])
            .page("Hades", Region::In, &[("Hades", "₹ 2,500")]);

        let config = Config {
            home_region: Region::Ua,
            foreign_region: Region::In,
            conversion_rate: rust_decimal::Decimal::new(1, 0),
            ..make_test_config()
        };
        let cmd = CompareCommand::new(config);
        let records = cmd.collect(&client, &games(&["Hades"])).await.unwrap();

        assert_eq!(records[0].standard_price_home.to_string(), "9.99");
        assert_eq!(records[0].standard_price_foreign.to_string(), "25.00");
        assert_eq!(records[0].difference_standard.to_string(), "-15.01");
    }

    #[tokio::test]
    async fn test_execute_formats_and_exports() {
        let client = MockStore::default()
            .page("Hades", Region::In, &[("Hades", "₹ 2,500")])
            .page("Hades", Region::Ua, &[("Hades", "₴ 999")]);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xlsx");
        let config =
            Config { format: OutputFormat::Csv, output: Some(path.clone()), ..make_test_config() };

        let cmd = CompareCommand::new(config);
        let output = cmd.execute_with_client(&client, &games(&["Hades"])).await.unwrap();

        assert!(output.contains("Hades,25.00,25.00,9.99,20.28,4.72"));
        assert!(output.contains("Total,25.00"));
        assert!(path.exists());
    }
}
