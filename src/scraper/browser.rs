//! Browser session provisioning using chromiumoxide.
//!
//! Two launch targets exist: a locally installed Chrome for development
//! machines, and a pinned prebuilt Chromium for the constrained
//! serverless host. The target is resolved once per invocation from
//! configuration; nothing downstream branches on the environment.

use chromiumoxide::browser::{Browser as ChromeBrowser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;

use crate::config::ScraperConfig;
use crate::scraper::ScrapeError;

/// Prebuilt Chromium release expected at `scraper.chromium_path` on the
/// serverless target. Unpacking it there is the hosting platform's job.
pub const PINNED_CHROMIUM_RELEASE: &str = "v121.0.0";

/// Where the browser process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchTarget {
    /// Developer machine with a full Chrome install
    Local,
    /// Constrained serverless host with the pinned prebuilt binary
    Serverless,
}

impl LaunchTarget {
    /// Resolve the target from configuration, once per invocation.
    pub fn resolve(config: &ScraperConfig) -> Self {
        if config.serverless {
            LaunchTarget::Serverless
        } else {
            LaunchTarget::Local
        }
    }
}

/// Browser session owned by a single pipeline invocation
pub struct Browser {
    browser: ChromeBrowser,
    handle: tokio::task::JoinHandle<()>,
}

impl Browser {
    /// Launch a headless browser appropriate to the current target.
    pub async fn launch(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let target = LaunchTarget::resolve(config);
        tracing::debug!("Launching browser for target {:?}", target);

        let browser_config = match target {
            LaunchTarget::Local => local_config(config),
            LaunchTarget::Serverless => serverless_config(config),
        }
        .map_err(|e| ScrapeError::Launch(format!("invalid browser config: {}", e)))?;

        let (browser, mut handler) = ChromeBrowser::launch(browser_config)
            .await
            .map_err(|e| ScrapeError::Launch(e.to_string()))?;

        // Spawn handler task - must keep running for browser to work
        let handle = tokio::spawn(async move {
            loop {
                match handler.next().await {
                    Some(Ok(_)) => continue,
                    Some(Err(_)) => continue, // Don't break on errors
                    None => break,
                }
            }
        });

        Ok(Self { browser, handle })
    }

    /// Open a new blank page on the session.
    pub async fn new_page(&self) -> Result<Page, ScrapeError> {
        self.browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScrapeError::Launch(format!("failed to create page: {}", e)))
    }

    /// Close the browser. Never raises: teardown problems are reported to
    /// the caller but must not mask the pipeline outcome.
    pub async fn close(mut self) -> Result<(), String> {
        let result = self.browser.close().await.map_err(|e| e.to_string());
        self.handle.abort();
        result.map(|_| ())
    }
}

/// Full Chrome on a developer machine, flags for unattended automation.
fn local_config(config: &ScraperConfig) -> Result<BrowserConfig, String> {
    let chrome_path = config
        .chrome_path
        .clone()
        .unwrap_or_else(|| default_chrome_path().to_string());

    BrowserConfig::builder()
        .chrome_executable(chrome_path)
        .no_sandbox()
        .disable_default_args()
        .arg("--headless=new")
        .arg("--disable-setuid-sandbox")
        .arg("--ignore-certificate-errors")
        .arg("--ignore-certificate-errors-spki-list")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-gpu")
        .window_size(1280, 800)
        .build()
}

/// Pinned Chromium on the constrained host: restricted flag set, and the
/// letterboxed default window the binary mandates.
fn serverless_config(config: &ScraperConfig) -> Result<BrowserConfig, String> {
    tracing::debug!(
        "Using prebuilt Chromium {} at {}",
        PINNED_CHROMIUM_RELEASE,
        config.chromium_path
    );

    BrowserConfig::builder()
        .chrome_executable(config.chromium_path.as_str())
        .no_sandbox()
        .arg("--disable-setuid-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-gpu")
        .arg("--single-process")
        .arg("--no-zygote")
        .build()
}

/// Find Chrome executable for the local target
fn default_chrome_path() -> &'static str {
    if cfg!(target_os = "macos") {
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"
    } else if cfg!(target_os = "windows") {
        "C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe"
    } else {
        "google-chrome"
    }
}
