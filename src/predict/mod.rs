//! Prediction service wire types and the [`Predictor`] seam.
//!
//! The dashboard only ever talks to a `dyn Predictor`; [`HttpPredictor`] is
//! the production implementation over HTTP.

mod client;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::form::Reading;

pub use client::{HealthStatus, HttpPredictor};

/// The one message users see for any failed prediction.
pub const FAILURE_MESSAGE: &str = "Prediction failed.";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// JSON body for `POST /api/predict` (and the forecast endpoints).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictRequest<'a> {
    pub current_energy_usage: f64,
    #[serde(rename = "temperature_C")]
    pub temperature_c: f64,
    pub humidity_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<&'a str>,
}

impl<'a> From<&'a Reading> for PredictRequest<'a> {
    fn from(reading: &'a Reading) -> Self {
        Self {
            current_energy_usage: reading.energy,
            temperature_c: reading.temperature,
            humidity_pct: reading.humidity,
            timestamp: reading.timestamp.as_deref(),
        }
    }
}

/// Raw response body. The prediction is kept as a loose JSON value so a
/// wrong type can be reported instead of failing deserialization outright.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predicted_energy_next_hour: Option<serde_json::Value>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    model_used: Option<String>,
}

/// Error body returned by the service on 4xx/5xx.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// A successful next-hour prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub predicted_energy: f64,
    /// Server-reported timestamp, if any.
    pub timestamp: Option<String>,
    /// Server-reported model name, if any.
    pub model_used: Option<String>,
}

impl Prediction {
    pub fn new(predicted_energy: f64) -> Self {
        Self {
            predicted_energy,
            timestamp: None,
            model_used: None,
        }
    }

    /// Decode a `/api/predict` response body.
    ///
    /// A missing or non-numeric `predicted_energy_next_hour` is an error; it
    /// is never coerced to NaN.
    pub fn from_json(body: &str) -> Result<Self, PredictError> {
        let resp: PredictResponse =
            serde_json::from_str(body).map_err(|e| PredictError::Malformed(e.to_string()))?;

        let predicted_energy = match resp.predicted_energy_next_hour {
            None | Some(serde_json::Value::Null) => return Err(PredictError::MissingPrediction),
            Some(serde_json::Value::Number(n)) => n
                .as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| PredictError::Malformed(format!("unrepresentable number {n}")))?,
            Some(other) => {
                return Err(PredictError::Malformed(format!(
                    "predicted_energy_next_hour is not a number: {other}"
                )));
            }
        };

        Ok(Self {
            predicted_energy,
            timestamp: resp.timestamp.filter(|s| !s.is_empty()),
            model_used: resp.model_used.filter(|s| !s.is_empty()),
        })
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a prediction request failed. All variants surface to the user as
/// [`FAILURE_MESSAGE`]; the detail is for logs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service returned HTTP {code}{}", status_detail(.message))]
    Status { code: u16, message: Option<String> },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("response has no predicted_energy_next_hour")]
    MissingPrediction,
}

impl PredictError {
    /// The message shown in the dashboard.
    pub fn user_message(&self) -> &'static str {
        FAILURE_MESSAGE
    }

    /// Build a status error, pulling `{"error": ...}` out of the body if present.
    pub(crate) fn from_status(code: u16, body: Option<&str>) -> Self {
        let message = body
            .and_then(|b| serde_json::from_str::<ErrorBody>(b).ok())
            .map(|e| e.error);
        Self::Status { code, message }
    }
}

fn status_detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Predictor seam
// ---------------------------------------------------------------------------

/// Anything that can turn a reading into a next-hour prediction.
///
/// Implementations are called from worker threads, one call per click.
pub trait Predictor: Send + Sync {
    fn predict(&self, reading: &Reading) -> Result<Prediction, PredictError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(ts: Option<&str>) -> Reading {
        Reading {
            energy: 10.0,
            temperature: 25.0,
            humidity: 40.0,
            timestamp: ts.map(str::to_string),
        }
    }

    #[test]
    fn request_uses_service_field_names() {
        let r = reading(Some("2025-11-19T14:00"));
        let json = serde_json::to_value(PredictRequest::from(&r)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "current_energy_usage": 10.0,
                "temperature_C": 25.0,
                "humidity_pct": 40.0,
                "timestamp": "2025-11-19T14:00",
            })
        );
    }

    #[test]
    fn request_omits_missing_timestamp() {
        let r = reading(None);
        let json = serde_json::to_string(&PredictRequest::from(&r)).unwrap();
        assert!(!json.contains("timestamp"));
    }

    #[test]
    fn decodes_full_response() {
        let p = Prediction::from_json(
            r#"{"predicted_energy_next_hour": 123.45, "model_used": "xgboost", "timestamp": "2025-11-19 14:00:00"}"#,
        )
        .unwrap();
        assert_eq!(p.predicted_energy, 123.45);
        assert_eq!(p.model_used.as_deref(), Some("xgboost"));
        assert_eq!(p.timestamp.as_deref(), Some("2025-11-19 14:00:00"));
    }

    #[test]
    fn integer_prediction_is_accepted() {
        let p = Prediction::from_json(r#"{"predicted_energy_next_hour": 6}"#).unwrap();
        assert_eq!(p.predicted_energy, 6.0);
        assert_eq!(p.timestamp, None);
        assert_eq!(p.model_used, None);
    }

    #[test]
    fn empty_metadata_counts_as_absent() {
        let p = Prediction::from_json(
            r#"{"predicted_energy_next_hour": 1.0, "timestamp": "", "model_used": ""}"#,
        )
        .unwrap();
        assert_eq!(p.timestamp, None);
        assert_eq!(p.model_used, None);
    }

    #[test]
    fn missing_prediction_is_an_error() {
        assert_eq!(
            Prediction::from_json(r#"{"model_used": "xgboost"}"#),
            Err(PredictError::MissingPrediction)
        );
        assert_eq!(
            Prediction::from_json(r#"{"predicted_energy_next_hour": null}"#),
            Err(PredictError::MissingPrediction)
        );
    }

    #[test]
    fn non_numeric_prediction_is_malformed() {
        let err = Prediction::from_json(r#"{"predicted_energy_next_hour": "12.3"}"#).unwrap_err();
        assert!(matches!(err, PredictError::Malformed(_)));

        let err = Prediction::from_json("<html>oops</html>").unwrap_err();
        assert!(matches!(err, PredictError::Malformed(_)));
    }

    #[test]
    fn status_error_keeps_service_message() {
        let err = PredictError::from_status(500, Some(r#"{"error": "Model not loaded on server"}"#));
        assert_eq!(
            err.to_string(),
            "service returned HTTP 500: Model not loaded on server"
        );

        let err = PredictError::from_status(502, Some("Bad Gateway"));
        assert_eq!(err.to_string(), "service returned HTTP 502");
    }

    #[test]
    fn every_error_has_the_same_user_message() {
        let errors = [
            PredictError::Transport("connection refused".into()),
            PredictError::from_status(400, None),
            PredictError::Malformed("eof".into()),
            PredictError::MissingPrediction,
        ];
        for err in errors {
            assert_eq!(err.user_message(), "Prediction failed.");
        }
    }
}
