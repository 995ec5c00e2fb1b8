//! API route handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::scraper::{self, ScrapeError};
use crate::types::{ErrorResponse, ExchangeRateResult, HealthResponse};

/// Stable top-level message for every failed scrape; consumers display it
/// as-is and treat all failures uniformly.
pub const RATE_UNAVAILABLE: &str = "No se pudo obtener la información del BCV";

/// Application state shared across handlers.
pub struct AppState {
    pub config: AppConfig,
}

/// Error type for API handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    details: String,
}

impl From<ScrapeError> for ApiError {
    fn from(e: ScrapeError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: RATE_UNAVAILABLE.to_string(),
            details: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.error,
            details: self.details,
            success: false,
        });
        (self.status, body).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Exchange rate endpoint. Runs one full scrape per request; concurrent
/// requests each own an independent browser session.
pub async fn bcv_rate(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ExchangeRateResult>, ApiError> {
    let result = scraper::fetch_rate(&state.config.scraper).await?;
    Ok(Json(result))
}
