//! steam-region-hunter - Compare Steam game prices across two storefront regions
//!
//! Matches each requested game against the search results of a home and a foreign
//! storefront, cleans the scraped prices and reports the difference after converting
//! foreign prices into the home currency.

pub mod commands;
pub mod comparator;
pub mod config;
pub mod export;
pub mod format;
pub mod matching;
pub mod observer;
pub mod pricing;
pub mod steam;

pub use comparator::{Comparator, ComparisonRecord, HomeMatch};
pub use config::Config;
pub use matching::{MatchRejection, MatchResult, MatchSettings, Matcher};
pub use observer::{ComparisonObserver, NoopObserver, TracingObserver};
pub use pricing::{clean_price, convert_price, CleanedPrice};
pub use steam::{RawListing, Region};
