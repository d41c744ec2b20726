//! Steam store modules for HTTP client, parsing, and data models.

pub mod client;
pub mod models;
pub mod parser;
pub mod regions;
pub mod selectors;

pub use client::{SteamClient, StoreSearch};
pub use models::{RawListing, SearchResults};
pub use parser::Parser;
pub use regions::{Region, RegionParseError};
