//! Parsing of scraped, locale-formatted price text.

use super::{CleanedPrice, UNAVAILABLE};
use crate::steam::Region;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Raw standard and discounted price text taken from one listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PriceTiers {
    pub standard: String,
    pub discount: String,
}

/// Splits a listing's price blob into its standard and discounted lines.
///
/// The first price line is the pre-discount price and the optional second line the
/// discounted one. A single line fills both tiers. Blank lines and discount badges such as
/// `-50%` are skipped. An empty blob yields two empty tiers.
pub fn parse_price_block(text: &str) -> PriceTiers {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty() && !is_discount_badge(l));

    let standard = lines.next().unwrap_or_default().to_string();
    let discount = lines.next().map(str::to_string).unwrap_or_else(|| standard.clone());

    PriceTiers { standard, discount }
}

fn is_discount_badge(line: &str) -> bool {
    line.starts_with('-') && line.ends_with('%')
}

/// Cleans a raw price string into a two-decimal amount in major units.
///
/// Scraped prices are integer minor units: `"₹999"` is 9.99. For regions whose text
/// carries a `.`-delimited suffix after the minor-unit integer, everything from the first
/// `.` is dropped before parsing. `"free"` in any case is zero. Empty text, `N/A`,
/// negative values and anything that does not parse are unavailable.
///
/// The discount flag lets both tiers go through the same call; it does not change the
/// result.
pub fn clean_price(raw: &str, region: Region, _is_discount: bool) -> CleanedPrice {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .filter(|c| !Region::all().iter().any(|r| r.symbol() == *c))
        .collect();

    if cleaned.eq_ignore_ascii_case("free") {
        return CleanedPrice::amount(Decimal::ZERO);
    }

    let numeric = if region.truncates_minor_units() {
        cleaned.split('.').next().unwrap_or_default()
    } else {
        cleaned.as_str()
    };

    if numeric.is_empty() || numeric == UNAVAILABLE {
        return CleanedPrice::Unavailable;
    }

    match Decimal::from_str(numeric) {
        Ok(minor) if !minor.is_sign_negative() => {
            CleanedPrice::amount(minor / Decimal::ONE_HUNDRED)
        }
        _ => CleanedPrice::Unavailable,
    }
}
