//! Rate extraction pipeline.
//!
//! One linear sequence per invocation: launch, page setup, navigation,
//! snapshot, extraction, normalization, result assembly. The browser
//! session is scoped to the invocation and closed exactly once on every
//! exit path. No internal retries; a failed run reports immediately and
//! leaves retry decisions to the caller.

use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::page::Page;
use chrono::{Local, Locale, SecondsFormat, Utc};

use crate::config::ScraperConfig;
use crate::scraper::{extract, Browser, ScrapeError, SOURCE_LABEL};
use crate::types::ExchangeRateResult;

/// Fixed desktop viewport for the scrape page
const VIEWPORT_WIDTH: i64 = 1280;
const VIEWPORT_HEIGHT: i64 = 800;

/// Run one full pipeline invocation and return a validated rate.
///
/// The session teardown runs whether the scrape succeeded or failed at
/// any stage; a teardown problem is logged and never masks the outcome.
pub async fn fetch_rate(config: &ScraperConfig) -> Result<ExchangeRateResult, ScrapeError> {
    tracing::info!("Starting BCV scrape");
    let browser = Browser::launch(config).await?;

    let outcome = scrape(&browser, config).await;

    if let Err(e) = browser.close().await {
        tracing::warn!("Browser teardown failed: {}", e);
    } else {
        tracing::debug!("Browser closed");
    }

    match &outcome {
        Ok(result) => tracing::info!("Rate found: {}", result.rate),
        Err(e) => tracing::error!("Scrape failed: {}", e),
    }

    outcome
}

/// Everything between launch and teardown.
async fn scrape(
    browser: &Browser,
    config: &ScraperConfig,
) -> Result<ExchangeRateResult, ScrapeError> {
    let page = browser.new_page().await?;

    setup_page(&page, config).await?;

    tracing::debug!("Navigating to {}", config.url);
    navigate(&page, config).await?;

    let html = page.content().await.map_err(|e| ScrapeError::Navigation {
        url: config.url.clone(),
        message: format!("failed to read page content: {}", e),
    })?;

    // Page is done once we hold the snapshot
    let _ = page.close().await;

    let raw = extract::extract_rate_text(&html).ok_or(ScrapeError::Extraction)?;
    tracing::debug!("Raw rate text: {:?}", raw);

    let rate = extract::normalize_rate(&raw).ok_or(ScrapeError::Validation { raw })?;

    Ok(build_result(rate))
}

/// Set the browser identity and a fixed 1280x800 viewport before
/// navigating; the site may block unset or bot-like identities.
async fn setup_page(page: &Page, config: &ScraperConfig) -> Result<(), ScrapeError> {
    page.set_user_agent(config.user_agent.as_str())
        .await
        .map_err(|e| ScrapeError::Launch(format!("failed to set user agent: {}", e)))?;

    let viewport = SetDeviceMetricsOverrideParams::builder()
        .width(VIEWPORT_WIDTH)
        .height(VIEWPORT_HEIGHT)
        .device_scale_factor(1.0)
        .mobile(false)
        .build()
        .map_err(ScrapeError::Launch)?;

    page.execute(viewport)
        .await
        .map_err(|e| ScrapeError::Launch(format!("failed to set viewport: {}", e)))?;

    Ok(())
}

async fn navigate(page: &Page, config: &ScraperConfig) -> Result<(), ScrapeError> {
    let nav_error = |e: chromiumoxide::error::CdpError| ScrapeError::Navigation {
        url: config.url.clone(),
        message: e.to_string(),
    };

    page.goto(config.url.as_str()).await.map_err(&nav_error)?;
    page.wait_for_navigation().await.map_err(&nav_error)?;

    // Let late content settle before snapshotting
    tokio::time::sleep(tokio::time::Duration::from_millis(config.settle_ms)).await;

    Ok(())
}

/// Assemble the success record for "now".
fn build_result(rate: f64) -> ExchangeRateResult {
    let now = Local::now();

    ExchangeRateResult {
        rate,
        last_update: now
            .format_localized("%-d de %B de %Y", Locale::es_VE)
            .to_string(),
        source: SOURCE_LABEL.to_string(),
        timestamp: now
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        success: true,
    }
}
