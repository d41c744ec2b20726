//! Steam storefront regions and their currency conventions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supported Steam storefront regions.
///
/// Only two storefronts are compared at a time: the home region whose currency the
/// report is expressed in, and the foreign region whose prices get converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    In,
    Ua,
}

impl Region {
    /// Returns the `cc` query parameter Steam uses for this storefront.
    pub fn country_code(&self) -> &'static str {
        match self {
            Region::In => "in",
            Region::Ua => "ua",
        }
    }

    /// Returns the human-readable country name used in report headers.
    pub fn name(&self) -> &'static str {
        match self {
            Region::In => "India",
            Region::Ua => "Ukraine",
        }
    }

    /// Returns the ISO currency code for this region.
    pub fn currency(&self) -> &'static str {
        match self {
            Region::In => "INR",
            Region::Ua => "UAH",
        }
    }

    /// Returns the currency glyph shown in scraped prices.
    pub fn symbol(&self) -> char {
        match self {
            Region::In => '₹',
            Region::Ua => '₴',
        }
    }

    /// Returns the Accept-Language header value for this region.
    pub fn accept_language(&self) -> &'static str {
        match self {
            Region::In => "en-IN,en;q=0.9,hi;q=0.8",
            Region::Ua => "uk-UA,uk;q=0.9,en;q=0.8",
        }
    }

    /// Whether scraped prices carry a spurious `.`-delimited suffix after the
    /// minor-unit integer that must be cut off before parsing.
    pub fn truncates_minor_units(&self) -> bool {
        matches!(self, Region::Ua)
    }

    /// Returns all supported regions.
    pub fn all() -> &'static [Region] {
        &[Region::In, Region::Ua]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.country_code())
    }
}

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in" | "india" => Ok(Region::In),
            "ua" | "ukraine" => Ok(Region::Ua),
            _ => Err(RegionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Unknown region '{0}'. Valid regions: in, ua")]
pub struct RegionParseError(String);
