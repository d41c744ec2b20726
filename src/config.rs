//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::matching::matcher::{DEFAULT_STOP_WORDS, DEFAULT_THRESHOLD};
use crate::matching::normalize::DEFAULT_NOISE_TOKENS;
use crate::matching::MatchSettings;
use crate::pricing::DEFAULT_CONVERSION_RATE;
use crate::steam::regions::Region;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Region whose currency the report uses
    #[serde(default = "default_home_region")]
    pub home_region: Region,

    /// Region whose prices get converted
    #[serde(default = "default_foreign_region")]
    pub foreign_region: Region,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Base delay between requests in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Random jitter added to delay (0 to this value)
    #[serde(default = "default_delay_jitter_ms")]
    pub delay_jitter_ms: u64,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Foreign-to-home currency multiplier
    #[serde(default = "default_conversion_rate")]
    pub conversion_rate: Decimal,

    /// Minimum similarity for a fuzzy title match
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Words that never count as key words
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,

    /// Edition noise stripped from titles
    #[serde(default = "default_noise_tokens")]
    pub noise_tokens: Vec<String>,

    /// Spreadsheet report path
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_home_region() -> Region {
    Region::In
}

fn default_foreign_region() -> Region {
    Region::Ua
}

fn default_delay_ms() -> u64 {
    1500
}

fn default_delay_jitter_ms() -> u64 {
    1000
}

fn default_conversion_rate() -> Decimal {
    DEFAULT_CONVERSION_RATE
}

fn default_similarity_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_stop_words() -> Vec<String> {
    DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect()
}

fn default_noise_tokens() -> Vec<String> {
    DEFAULT_NOISE_TOKENS.iter().map(|t| t.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            home_region: default_home_region(),
            foreign_region: default_foreign_region(),
            proxy: None,
            delay_ms: default_delay_ms(),
            delay_jitter_ms: default_delay_jitter_ms(),
            format: OutputFormat::Table,
            conversion_rate: default_conversion_rate(),
            similarity_threshold: default_similarity_threshold(),
            stop_words: default_stop_words(),
            noise_tokens: default_noise_tokens(),
            output: None,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("steam-region-hunter").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(proxy) = std::env::var("SRH_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(delay) = std::env::var("SRH_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        if let Ok(rate) = std::env::var("SRH_RATE") {
            if let Ok(r) = rate.parse() {
                self.conversion_rate = r;
            }
        }

        self
    }

    /// Checks values that would make a comparison meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.home_region == self.foreign_region {
            anyhow::bail!("Home and foreign regions must differ (both are '{}')", self.home_region);
        }

        if self.conversion_rate <= Decimal::ZERO {
            anyhow::bail!("Conversion rate must be positive, got {}", self.conversion_rate);
        }

        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            anyhow::bail!(
                "Similarity threshold must be between 0 and 1, got {}",
                self.similarity_threshold
            );
        }

        Ok(())
    }

    /// Returns the title-matching parameters.
    pub fn match_settings(&self) -> MatchSettings {
        MatchSettings {
            threshold: self.similarity_threshold,
            stop_words: self.stop_words.clone(),
            noise_tokens: self.noise_tokens.clone(),
        }
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
