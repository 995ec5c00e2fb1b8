//! Configuration for the BCV API.

use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Scraper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Page to scrape for the official rate
    #[serde(default = "default_url")]
    pub url: String,
    /// Browser identity sent before navigation
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Launch against the constrained serverless target instead of a
    /// locally installed Chrome. Forced on when `VERCEL` is set.
    #[serde(default)]
    pub serverless: bool,
    /// Override for the local Chrome executable
    #[serde(default)]
    pub chrome_path: Option<String>,
    /// Location of the pinned prebuilt Chromium used in serverless mode.
    /// The hosting platform is responsible for unpacking the release there.
    #[serde(default = "default_chromium_path")]
    pub chromium_path: String,
    /// Post-navigation settle delay in milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

fn default_url() -> String {
    crate::scraper::BCV_URL.to_string()
}

fn default_user_agent() -> String {
    crate::scraper::USER_AGENT.to_string()
}

fn default_chromium_path() -> String {
    "/tmp/chromium/chrome".to_string()
}

fn default_settle_ms() -> u64 {
    1500
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            user_agent: default_user_agent(),
            serverless: false,
            chrome_path: None,
            chromium_path: default_chromium_path(),
            settle_ms: default_settle_ms(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
}

impl AppConfig {
    /// Load configuration from environment and config file
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Add config file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (BCV_SERVER__PORT,
            // BCV_SCRAPER__SETTLE_MS, etc.). Double underscore between
            // levels keeps multi-word keys addressable.
            .add_source(
                config::Environment::with_prefix("BCV")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = config.try_deserialize()?;

        // Hosting platform signal, kept for parity with the original deploy
        if std::env::var_os("VERCEL").is_some() {
            config.scraper.serverless = true;
        }

        Ok(config)
    }
}
