//! Cross-region price comparison for a single product.

use crate::matching::{MatchResult, Matcher};
use crate::observer::{ComparisonObserver, NoopObserver};
use crate::pricing::{
    clean_price, convert_price, difference, parse_price_block, CleanedPrice, PriceTiers,
    DEFAULT_CONVERSION_RATE,
};
use crate::steam::{RawListing, Region};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

/// Price comparison of one product between the home and foreign storefronts.
///
/// Foreign amounts are given both as scraped and converted into the home currency.
/// Differences are `home - foreign converted`, so a positive value means the foreign
/// storefront is cheaper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRecord {
    pub product_name: String,
    pub standard_price_home: CleanedPrice,
    pub discount_price_home: CleanedPrice,
    pub standard_price_foreign: CleanedPrice,
    pub standard_price_foreign_converted: CleanedPrice,
    pub difference_standard: CleanedPrice,
    pub discount_price_foreign: CleanedPrice,
    pub discount_price_foreign_converted: CleanedPrice,
    pub difference_discount: CleanedPrice,
}

impl ComparisonRecord {
    /// The eight price columns in report order.
    pub fn prices(&self) -> [CleanedPrice; 8] {
        [
            self.standard_price_home,
            self.discount_price_home,
            self.standard_price_foreign,
            self.standard_price_foreign_converted,
            self.difference_standard,
            self.discount_price_foreign,
            self.discount_price_foreign_converted,
            self.difference_discount,
        ]
    }
}

/// A product matched in the home storefront, waiting for the foreign side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeMatch {
    product: String,
    title: String,
    tiers: PriceTiers,
}

impl HomeMatch {
    /// Product name as requested.
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Normalized title of the matched home listing.
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Matches a product in both storefronts and computes the price differences.
#[derive(Clone)]
pub struct Comparator {
    matcher: Matcher,
    home: Region,
    foreign: Region,
    rate: Decimal,
    observer: Arc<dyn ComparisonObserver>,
}

impl Comparator {
    /// Creates a comparator converting `foreign` prices into the `home` currency at `rate`.
    pub fn new(matcher: Matcher, home: Region, foreign: Region, rate: Decimal) -> Self {
        Self { matcher, home, foreign, rate, observer: Arc::new(NoopObserver) }
    }

    /// Attaches an observer to the comparator and its matcher.
    pub fn with_observer(mut self, observer: Arc<dyn ComparisonObserver>) -> Self {
        self.matcher = self.matcher.with_observer(observer.clone());
        self.observer = observer;
        self
    }

    pub fn home_region(&self) -> Region {
        self.home
    }

    pub fn foreign_region(&self) -> Region {
        self.foreign
    }

    /// Matches the product against home listings.
    ///
    /// Returns `None` when nothing matches; the product then yields no record and the
    /// foreign storefront need not be searched.
    pub fn match_home(&self, product: &str, listings: &[RawListing]) -> Option<HomeMatch> {
        let Some((title, tiers)) = self.match_listing(product, listings) else {
            self.observer.product_skipped(product, self.home);
            return None;
        };

        Some(HomeMatch { product: product.to_string(), title, tiers })
    }

    /// Completes a home match with the foreign listings.
    ///
    /// An unmatched foreign side leaves its prices and both differences unavailable.
    pub fn complete(&self, home: HomeMatch, listings: &[RawListing]) -> ComparisonRecord {
        let foreign = self.match_listing(&home.product, listings).map(|(_, tiers)| tiers);

        let standard_price_home = clean_price(&home.tiers.standard, self.home, false);
        let discount_price_home = clean_price(&home.tiers.discount, self.home, true);

        let (standard_price_foreign, discount_price_foreign) = match &foreign {
            Some(tiers) => (
                clean_price(&tiers.standard, self.foreign, false),
                clean_price(&tiers.discount, self.foreign, true),
            ),
            None => (CleanedPrice::Unavailable, CleanedPrice::Unavailable),
        };

        let standard_price_foreign_converted = convert_price(standard_price_foreign, self.rate);
        let discount_price_foreign_converted = convert_price(discount_price_foreign, self.rate);

        ComparisonRecord {
            product_name: home.product,
            standard_price_home,
            discount_price_home,
            standard_price_foreign,
            standard_price_foreign_converted,
            difference_standard: difference(standard_price_home, standard_price_foreign_converted),
            discount_price_foreign,
            discount_price_foreign_converted,
            difference_discount: difference(discount_price_home, discount_price_foreign_converted),
        }
    }

    /// Compares one product across both storefronts.
    pub fn compare(
        &self,
        product: &str,
        home: &[RawListing],
        foreign: &[RawListing],
    ) -> Option<ComparisonRecord> {
        self.match_home(product, home).map(|matched| self.complete(matched, foreign))
    }

    fn match_listing(
        &self,
        product: &str,
        listings: &[RawListing],
    ) -> Option<(String, PriceTiers)> {
        let titles: Vec<&str> = listings.iter().map(|l| l.title.as_str()).collect();

        let MatchResult::Found { title, index, .. } =
            self.matcher.find_best_match(product, &titles)
        else {
            return None;
        };

        let tiers = parse_price_block(&listings[index].price_text);
        self.observer.prices_extracted(&title, &tiers.standard, &tiers.discount);
        Some((title, tiers))
    }
}

impl std::fmt::Debug for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Comparator")
            .field("matcher", &self.matcher)
            .field("home", &self.home)
            .field("foreign", &self.foreign)
            .field("rate", &self.rate)
            .finish_non_exhaustive()
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new(Matcher::default(), Region::In, Region::Ua, DEFAULT_CONVERSION_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::sync::Mutex;

    fn amount(s: &str) -> CleanedPrice {
        CleanedPrice::Amount(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_compare_full_record() {
        let home = vec![RawListing::new("Hades", "₹2500")];
        let foreign = vec![RawListing::new("Hades", "₴999.00")];

        let record = Comparator::default().compare("Hades", &home, &foreign).unwrap();

        assert_eq!(record.product_name, "Hades");
        assert_eq!(record.standard_price_home, amount("25.00"));
        assert_eq!(record.discount_price_home, amount("25.00"));
        assert_eq!(record.standard_price_foreign, amount("9.99"));
        assert_eq!(record.standard_price_foreign_converted, amount("20.28"));
        assert_eq!(record.difference_standard, amount("4.72"));
        assert_eq!(record.difference_discount, amount("4.72"));
    }

    #[test]
    fn test_discount_tier_from_second_line() {
        let home = vec![RawListing::new("Celeste", "₹1000\n₹500")];
        let foreign = vec![RawListing::new("Celeste", "₴2000\n₴1000")];

        let record = Comparator::default().compare("Celeste", &home, &foreign).unwrap();

        assert_eq!(record.standard_price_home, amount("10.00"));
        assert_eq!(record.discount_price_home, amount("5.00"));
        assert_eq!(record.discount_price_foreign, amount("10.00"));
        assert_eq!(record.discount_price_foreign_converted, amount("20.30"));
        assert_eq!(record.difference_discount, amount("-15.30"));
    }

    #[test]
    fn test_missing_home_match_skips_product() {
        let foreign = vec![RawListing::new("Portal", "₴100")];
        let comparator = Comparator::default();

        assert!(comparator.compare("Portal", &[], &foreign).is_none());

        let unrelated = vec![RawListing::new("Stardew Valley", "₹500")];
        assert!(comparator.compare("Portal", &unrelated, &foreign).is_none());
    }

    #[test]
    fn test_foreign_failure_degrades_fields() {
        let home = vec![RawListing::new("Portal", "₹199")];
        let foreign = vec![RawListing::new("Terraria", "₴100")];

        let record = Comparator::default().compare("Portal", &home, &foreign).unwrap();

        assert_eq!(record.standard_price_home, amount("1.99"));
        assert!(record.standard_price_foreign.is_unavailable());
        assert!(record.standard_price_foreign_converted.is_unavailable());
        assert!(record.difference_standard.is_unavailable());
        assert!(record.discount_price_foreign.is_unavailable());
        assert!(record.difference_discount.is_unavailable());
    }

    #[test]
    fn test_unparsable_home_price_still_emits_record() {
        let home = vec![RawListing::new("Portal", "Coming soon")];
        let foreign = vec![RawListing::new("Portal", "₴100")];

        let record = Comparator::default().compare("Portal", &home, &foreign).unwrap();
        assert!(record.standard_price_home.is_unavailable());
        assert_eq!(record.standard_price_foreign, amount("1.00"));
        assert!(record.difference_standard.is_unavailable());
    }

    #[test]
    fn test_free_game() {
        let home = vec![RawListing::new("Dota 2", "Free")];
        let foreign = vec![RawListing::new("Dota 2", "free")];

        let record = Comparator::default().compare("Dota 2", &home, &foreign).unwrap();
        assert_eq!(record.difference_standard, amount("0.00"));
    }

    #[test]
    fn test_two_phase_matches_compare() {
        let comparator = Comparator::default();
        let home = vec![RawListing::new("Inside", "₹499")];
        let foreign = vec![RawListing::new("Inside", "₴19900")];

        let matched = comparator.match_home("Inside", &home).unwrap();
        assert_eq!(matched.product(), "Inside");
        assert_eq!(matched.title(), "INSIDE");

        let record = comparator.complete(matched, &foreign);
        assert_eq!(Some(record), comparator.compare("Inside", &home, &foreign));
    }

    #[test]
    fn test_custom_rate() {
        let comparator =
            Comparator::new(Matcher::default(), Region::In, Region::Ua, Decimal::new(1, 0));
        let home = vec![RawListing::new("Limbo", "₹500")];
        let foreign = vec![RawListing::new("Limbo", "₴500")];

        let record = comparator.compare("Limbo", &home, &foreign).unwrap();
        assert_eq!(record.standard_price_foreign_converted, amount("5.00"));
        assert_eq!(record.difference_standard, amount("0.00"));
    }

    #[test]
    fn test_prices_in_report_order() {
        let home = vec![RawListing::new("Hades", "₹2500")];
        let foreign = vec![RawListing::new("Hades", "₴999")];
        let record = Comparator::default().compare("Hades", &home, &foreign).unwrap();

        let prices = record.prices();
        assert_eq!(prices[0], record.standard_price_home);
        assert_eq!(prices[4], record.difference_standard);
        assert_eq!(prices[7], record.difference_discount);
    }

    #[test]
    fn test_record_serializes_na() {
        let home = vec![RawListing::new("Portal", "₹199")];
        let record = Comparator::default().compare("Portal", &home, &[]).unwrap();

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"standard_price_home\":\"1.99\""));
        assert!(json.contains("\"difference_standard\":\"N/A\""));
    }

    #[derive(Default)]
    struct SkipRecorder {
        skipped: Mutex<Vec<(String, Region)>>,
    }

    impl ComparisonObserver for SkipRecorder {
        fn product_skipped(&self, product: &str, region: Region) {
            self.skipped.lock().unwrap().push((product.to_string(), region));
        }
    }

    #[test]
    fn test_observer_notified_on_skip() {
        let recorder = Arc::new(SkipRecorder::default());
        let comparator = Comparator::default().with_observer(recorder.clone());

        assert!(comparator.compare("Portal", &[], &[]).is_none());
        assert_eq!(
            recorder.skipped.lock().unwrap().as_slice(),
            [("Portal".to_string(), Region::In)]
        );
    }
}
