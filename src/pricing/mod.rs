//! Fixed-point price values, cleaning and currency conversion.

pub mod cleaner;
pub mod convert;

pub use cleaner::{clean_price, parse_price_block, PriceTiers};
pub use convert::{convert_price, difference, DEFAULT_CONVERSION_RATE};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;

/// Marker rendered for prices that could not be determined.
pub const UNAVAILABLE: &str = "N/A";

/// A price in major currency units, or the explicit absence of one.
///
/// Amounts are kept at two decimal places. Cleaned listing prices are never negative;
/// differences between prices reuse this type and may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CleanedPrice {
    Amount(Decimal),
    #[default]
    Unavailable,
}

impl CleanedPrice {
    /// Builds an amount rounded to two decimal places (half away from zero).
    pub fn amount(value: Decimal) -> Self {
        CleanedPrice::Amount(round_cents(value))
    }

    /// Returns the amount if available.
    pub fn value(&self) -> Option<Decimal> {
        match self {
            CleanedPrice::Amount(value) => Some(*value),
            CleanedPrice::Unavailable => None,
        }
    }

    /// Returns true if no amount is available.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CleanedPrice::Unavailable)
    }

    /// Returns the amount, counting unavailable prices as zero.
    pub fn value_or_zero(&self) -> Decimal {
        self.value().unwrap_or(Decimal::ZERO)
    }
}

impl fmt::Display for CleanedPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanedPrice::Amount(value) => write!(f, "{}", round_cents(*value)),
            CleanedPrice::Unavailable => f.write_str(UNAVAILABLE),
        }
    }
}

impl Serialize for CleanedPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Rounds to cents, half away from zero, and pins the scale so `499` prints as `499.00`.
pub(crate) fn round_cents(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
