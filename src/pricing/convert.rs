//! Currency conversion and price differences.

use super::CleanedPrice;
use rust_decimal::Decimal;

/// Default foreign-to-home conversion rate (2.03).
pub const DEFAULT_CONVERSION_RATE: Decimal = Decimal::from_parts(203, 0, 0, false, 2);

/// Converts a price with a fixed multiplicative rate, rounding to cents.
///
/// A product too large for `Decimal` is unavailable.
pub fn convert_price(price: CleanedPrice, rate: Decimal) -> CleanedPrice {
    price
        .value()
        .and_then(|value| value.checked_mul(rate))
        .map_or(CleanedPrice::Unavailable, CleanedPrice::amount)
}

/// Returns `home - foreign`, or unavailable if either side is or the result overflows.
pub fn difference(home: CleanedPrice, foreign: CleanedPrice) -> CleanedPrice {
    match (home, foreign) {
        (CleanedPrice::Amount(h), CleanedPrice::Amount(f)) => {
            h.checked_sub(f).map_or(CleanedPrice::Unavailable, CleanedPrice::amount)
        }
        _ => CleanedPrice::Unavailable,
    }
}
