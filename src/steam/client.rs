//! HTTP client for Steam store requests using wreq for TLS fingerprint emulation.

use crate::config::Config;
use crate::steam::regions::Region;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Default Steam store address.
pub const STORE_URL: &str = "https://store.steampowered.com";

const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Trait for storefront searches - enables mocking for tests.
#[async_trait]
pub trait StoreSearch: Send + Sync {
    /// Searches the storefront of `region` and returns the HTML response.
    async fn search(&self, term: &str, region: Region) -> Result<String>;
}

/// Steam store HTTP client with browser impersonation and request pacing.
pub struct SteamClient {
    client: Client,
    delay_ms: u64,
    delay_jitter_ms: u64,
    base_url: Option<String>,
}

impl SteamClient {
    /// Creates a new Steam client with the given configuration.
    pub async fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, None).await
    }

    /// Creates a new Steam client with an optional custom base URL (for testing).
    pub async fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
            base_url,
        })
    }

    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(STORE_URL)
    }

    /// Builds the search URL for a term in a region.
    fn search_url(&self, term: &str, region: Region) -> String {
        format!(
            "{}/search/?term={}&cc={}",
            self.base_url(),
            urlencoding::encode(term),
            region.country_code()
        )
    }

    async fn get(&self, url: &str, region: Region) -> Result<String> {
        self.delay().await;

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", ACCEPT)
            .header("Accept-Language", region.accept_language())
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Cache-Control", "no-cache")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 429 || status == 503 {
            warn!("Rate limited ({}). Consider using a proxy or increasing delay.", status);
            anyhow::bail!("Rate limited by Steam. Try increasing --delay or using a proxy.");
        }

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }

    /// Adds a random delay between requests.
    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

#[async_trait]
impl StoreSearch for SteamClient {
    async fn search(&self, term: &str, region: Region) -> Result<String> {
        let url = self.search_url(term, region);

        info!("Searching '{}' in {} region", term, region.name());
        self.get(&url, region).await
    }
}
