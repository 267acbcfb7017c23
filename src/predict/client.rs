//! HTTP client for the energy prediction service.
//!
//! Talks to the service with the synchronous `ureq` client. Provides:
//!
//! - **Predict**: `POST /api/predict`, the next-hour prediction used by the dashboard.
//! - **Health**: `GET /api/health`, service status and loaded model.
//! - **Forecasts**: `POST /api/predict/24h` and `POST /api/predict/multistep`.
//!
//! Every call is a single attempt. Any non-2xx status is a failure
//! regardless of body.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{PredictError, PredictRequest, Prediction, Predictor};
use crate::config::DashConfig;
use crate::form::Reading;

/// Response body from `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// Response body from `POST /api/predict/24h`.
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    forecast_24h: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous prediction service client.
///
/// Cheap to share: the inner agent is reference counted, so one client is
/// built per process and handed to every worker thread.
#[derive(Debug, Clone)]
pub struct HttpPredictor {
    base_url: String,
    agent: ureq::Agent,
    timeout: Option<Duration>,
}

impl HttpPredictor {
    /// Build a client from the resolved config.
    pub fn from_config(config: &DashConfig) -> Self {
        let timeout = match config.api.timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        Self::new(&config.api.base_url, timeout)
    }

    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: builder.build(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the next-hour prediction endpoint.
    pub fn predict_url(&self) -> String {
        self.endpoint("/api/predict")
    }

    /// `GET /api/health`.
    pub fn health(&self) -> Result<HealthStatus, PredictError> {
        let url = self.endpoint("/api/health");
        tracing::debug!(%url, "checking service health");
        let body = into_body(self.agent.get(&url).call())?;
        decode(&body)
    }

    /// `POST /api/predict/24h`: 24 chained hourly predictions.
    pub fn forecast_24h(&self, reading: &Reading) -> Result<Vec<f64>, PredictError> {
        let body = self.post("/api/predict/24h", reading)?;
        let parsed: ForecastResponse = decode(&body)?;
        Ok(parsed.forecast_24h)
    }

    /// `POST /api/predict/multistep`: predictions at fixed horizons keyed
    /// like `"3h"`, `"6h"`, `"12h"`, `"24h"`.
    pub fn multistep(&self, reading: &Reading) -> Result<BTreeMap<String, f64>, PredictError> {
        let body = self.post("/api/predict/multistep", reading)?;
        decode(&body)
    }

    fn post(&self, path: &str, reading: &Reading) -> Result<String, PredictError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, timeout = ?self.timeout, "sending prediction request");
        let payload = PredictRequest::from(reading);
        into_body(self.agent.post(&url).send_json(&payload))
    }

    fn endpoint(&self, path: &str) -> String {
        // "localhost" may resolve to ::1 first while the service binds IPv4 only.
        format!("{}{}", self.base_url, path).replace("://localhost", "://127.0.0.1")
    }
}

impl Predictor for HttpPredictor {
    fn predict(&self, reading: &Reading) -> Result<Prediction, PredictError> {
        let body = self.post("/api/predict", reading)?;
        Prediction::from_json(&body)
    }
}

// ---------------------------------------------------------------------------
// Response handling
// ---------------------------------------------------------------------------

/// Collapse a ureq result into the success body or a [`PredictError`].
fn into_body(result: Result<ureq::Response, ureq::Error>) -> Result<String, PredictError> {
    match result {
        Ok(resp) => {
            let status = resp.status();
            if !(200..300).contains(&status) {
                let body = resp.into_string().ok();
                return Err(PredictError::from_status(status, body.as_deref()));
            }
            resp.into_string()
                .map_err(|e| PredictError::Transport(format!("failed to read body: {e}")))
        }
        Err(ureq::Error::Status(code, resp)) => {
            let body = resp.into_string().ok();
            Err(PredictError::from_status(code, body.as_deref()))
        }
        Err(ureq::Error::Transport(t)) => Err(PredictError::Transport(t.to_string())),
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, PredictError> {
    serde_json::from_str(body).map_err(|e| PredictError::Malformed(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
