//! Web scraper module for bcv.org.ve
//!
//! Provides browser automation, DOM extraction, and the rate pipeline.

pub mod browser;
pub mod extract;
pub mod pipeline;

pub use browser::Browser;
pub use pipeline::fetch_rate;

/// Official BCV page carrying the published USD rate
pub const BCV_URL: &str = "https://www.bcv.org.ve/";

/// Source label attached to every successful result
pub const SOURCE_LABEL: &str = "BCV";

/// Desktop browser identity; the site alters behavior for bot-like agents
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Pipeline-fatal failures, one per stage.
///
/// Teardown problems are deliberately absent: a close failure is logged
/// and never overrides the outcome already produced.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("no rate value found on the page")]
    Extraction,

    #[error("invalid rate value extracted: {raw:?}")]
    Validation { raw: String },
}
