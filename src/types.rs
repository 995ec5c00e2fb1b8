//! Response types for the BCV API.

use serde::{Deserialize, Serialize};

/// Successful exchange rate lookup.
///
/// Field names mirror the JSON contract consumed by the converter UI,
/// hence the camelCase `lastUpdate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRateResult {
    /// USD → VES rate, always finite and > 0
    pub rate: f64,
    /// Localized long-form date, e.g. "29 de agosto de 2026"
    #[serde(rename = "lastUpdate")]
    pub last_update: String,
    /// Fixed source label ("BCV")
    pub source: String,
    /// RFC 3339 instant of the scrape, UTC
    pub timestamp: String,
    pub success: bool,
}

/// API error response.
///
/// `error` is a stable top-level message; `details` carries the
/// stage-specific diagnostic from the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serializes_with_contract_keys() {
        let result = ExchangeRateResult {
            rate: 36.54,
            last_update: "29 de agosto de 2026".to_string(),
            source: "BCV".to_string(),
            timestamp: "2026-08-29T12:00:00.000Z".to_string(),
            success: true,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["rate"], 36.54);
        assert_eq!(json["lastUpdate"], "29 de agosto de 2026");
        assert_eq!(json["source"], "BCV");
        assert_eq!(json["success"], true);
        // The snake_case key must not leak into the payload
        assert!(json.get("last_update").is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let err = ErrorResponse {
            error: "No se pudo obtener la información del BCV".to_string(),
            details: "no rate value found on page".to_string(),
            success: false,
        };

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].is_string());
        assert!(json["details"].is_string());
    }
}
