/// Prediction client and dashboard tests against a local stub service.
///
/// Every test starts its own stub on a random loopback port, so the tests
/// are independent and need no running prediction service.
mod common;

use std::time::Duration;

use common::StubService;
use energy_dash::config::DashConfig;
use energy_dash::dashboard::{Applied, Dashboard};
use energy_dash::form::{FormInput, Reading};
use energy_dash::predict::{HttpPredictor, PredictError, Predictor};
use energy_dash::theme::{MemoryStore, ThemeManager};

fn client(stub: &StubService) -> HttpPredictor {
    HttpPredictor::new(&stub.base_url, Some(Duration::from_secs(5)))
}

fn dashboard(predictor: &HttpPredictor) -> Dashboard {
    let theme = ThemeManager::load(Box::new(MemoryStore::new()));
    Dashboard::new(&DashConfig::default(), theme, predictor.predict_url())
}

fn reading() -> Reading {
    Reading {
        energy: 300.0,
        temperature: 28.0,
        humidity: 55.0,
        timestamp: Some("2025-11-19T14:00".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[test]
fn predict_posts_json_payload() {
    let stub = StubService::once(
        200,
        r#"{"predicted_energy_next_hour": 123.45, "model_used": "xgboost", "timestamp": "2025-11-19 14:00:00"}"#,
    );

    let prediction = client(&stub).predict(&reading()).unwrap();
    assert_eq!(prediction.predicted_energy, 123.45);
    assert_eq!(prediction.model_used.as_deref(), Some("xgboost"));

    let req = stub.next_request().expect("stub saw the request");
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/api/predict");
    assert!(
        req.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"))
    );
    assert_eq!(
        req.json(),
        serde_json::json!({
            "current_energy_usage": 300.0,
            "temperature_C": 28.0,
            "humidity_pct": 55.0,
            "timestamp": "2025-11-19T14:00",
        })
    );
}

#[test]
fn blank_timestamp_is_not_sent() {
    let stub = StubService::once(200, r#"{"predicted_energy_next_hour": 1}"#);
    let predictor = client(&stub);
    let mut dash = dashboard(&predictor);
    dash.form = FormInput::new("1", "2", "3").with_timestamp("  ");

    assert_eq!(dash.predict_with(&predictor), Some(Applied::Rendered));
    let body = stub.next_request().unwrap().json();
    assert!(body.get("timestamp").is_none());
}

// ---------------------------------------------------------------------------
// Failure handling
// ---------------------------------------------------------------------------

#[test]
fn server_error_maps_to_status_with_message() {
    let stub = StubService::once(500, r#"{"error": "Model not loaded on server"}"#);
    let err = client(&stub).predict(&reading()).unwrap_err();
    assert_eq!(
        err,
        PredictError::Status {
            code: 500,
            message: Some("Model not loaded on server".to_string()),
        }
    );
}

#[test]
fn failed_status_adds_no_history() {
    let stub = StubService::once(400, r#"{"predicted_energy_next_hour": 99}"#);
    let predictor = client(&stub);
    let mut dash = dashboard(&predictor);
    dash.form = FormInput::new("1", "2", "3");

    assert_eq!(dash.predict_with(&predictor), Some(Applied::Failed));
    assert_eq!(dash.error(), Some("Prediction failed."));
    assert!(dash.history().is_empty());
    assert!(dash.result().is_none());
}

#[test]
fn missing_prediction_field_fails_instead_of_nan() {
    let stub = StubService::once(200, r#"{"model_used": "xgboost"}"#);
    let predictor = client(&stub);
    let mut dash = dashboard(&predictor);
    dash.form = FormInput::new("1", "2", "3");

    assert_eq!(dash.predict_with(&predictor), Some(Applied::Failed));
    assert_eq!(dash.error(), Some("Prediction failed."));
    assert!(dash.history().is_empty());
}

#[test]
fn non_json_body_is_malformed() {
    let stub = StubService::once(200, "<html>proxy error</html>");
    let err = client(&stub).predict(&reading()).unwrap_err();
    assert!(matches!(err, PredictError::Malformed(_)));
}

#[test]
fn invalid_form_never_reaches_service() {
    let stub = StubService::once(200, r#"{"predicted_energy_next_hour": 1}"#);
    let predictor = client(&stub);
    let mut dash = dashboard(&predictor);
    dash.form = FormInput::new("ten", "", "");

    assert_eq!(dash.predict_with(&predictor), None);
    assert_eq!(dash.error(), Some("Enter energy usage."));
    std::thread::sleep(Duration::from_millis(100));
    assert!(!stub.saw_request());
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn renders_two_decimal_prediction_and_history_row() {
    let stub = StubService::once(200, r#"{"predicted_energy_next_hour": 12.345}"#);
    let predictor = client(&stub);
    let mut dash = dashboard(&predictor);
    dash.form = FormInput::new("10", "25", "40");

    dash.predict_with(&predictor);

    assert_eq!(dash.result().unwrap().value, "12.35");
    let rows = dash.history().rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][1..], ["10.00", "25.00", "40.00", "12.35"]);
}

#[test]
fn server_timestamp_is_used_for_meta() {
    let stub = StubService::once(
        200,
        r#"{"predicted_energy_next_hour": 6, "timestamp": "2024-01-01T00:00:00Z"}"#,
    );
    let predictor = client(&stub);
    let mut dash = dashboard(&predictor);
    dash.form = FormInput::new("5", "20", "30");

    dash.predict_with(&predictor);

    let result = dash.result().unwrap();
    assert_eq!(result.meta, "2024-01-01T00:00:00Z");
    assert_eq!(result.value, "6.00");
    assert_eq!(result.model, "xgboost");
}

// ---------------------------------------------------------------------------
// Supplementary endpoints
// ---------------------------------------------------------------------------

#[test]
fn health_reports_status_and_model() {
    let stub = StubService::once(200, r#"{"status": "running", "model": "xgboost"}"#);
    let health = client(&stub).health().unwrap();
    assert_eq!(health.status, "running");
    assert_eq!(health.model.as_deref(), Some("xgboost"));
    assert_eq!(stub.next_request().unwrap().path, "/api/health");
}

#[test]
fn forecast_24h_returns_series() {
    let values: Vec<f64> = (0..24).map(|i| 100.0 + i as f64).collect();
    let body = serde_json::json!({ "forecast_24h": values }).to_string();
    let stub = StubService::start(vec![(200, body)]);

    let series = client(&stub).forecast_24h(&reading()).unwrap();
    assert_eq!(series.len(), 24);
    assert_eq!(series[23], 123.0);
    assert_eq!(stub.next_request().unwrap().path, "/api/predict/24h");
}

#[test]
fn multistep_returns_horizons() {
    let stub = StubService::once(200, r#"{"3h": 1.5, "6h": 2.5, "12h": 3.5, "24h": 4.5}"#);
    let horizons = client(&stub).multistep(&reading()).unwrap();
    assert_eq!(horizons.len(), 4);
    assert_eq!(horizons["12h"], 3.5);
}

#[test]
fn forecast_missing_fields_error_is_a_status() {
    let stub = StubService::once(400, r#"{"error": "Missing fields in request"}"#);
    let err = client(&stub).forecast_24h(&reading()).unwrap_err();
    assert!(matches!(err, PredictError::Status { code: 400, .. }));
}
