//! Configuration schema and defaults for energy-dash.
//!
//! Defines the TOML-serializable configuration structure with the sections
//! `[api]`, `[ui]`, `[export]`, and `[logging]`.
//!
//! Every field has a built-in default. Users only need to set the values
//! they want to override.

use serde::{Deserialize, Serialize};

/// Default prediction service base URL.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Label shown when the service does not report which model answered.
pub const DEFAULT_MODEL_LABEL: &str = "xgboost";

/// File name for CSV exports of the history ledger.
pub const DEFAULT_EXPORT_FILE: &str = "energy_history.csv";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level energy-dash configuration.
///
/// Maps directly to `~/.energy-dash/config.toml` and `.energy-dash.toml`.
/// All sections and fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Prediction service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the prediction service (without the `/api/...` suffix).
    pub base_url: String,
    /// Request timeout in milliseconds. `0` leaves the transport default.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// [ui]
// ---------------------------------------------------------------------------

/// Dashboard presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long the success indicator stays fully visible (milliseconds).
    pub success_visible_ms: u64,
    /// Length of the indicator's fade before it is hidden (milliseconds).
    pub success_fade_ms: u64,
    /// Model label used when the response omits `model_used`.
    pub default_model_label: String,
    /// Directory holding `preferences.toml`. Empty means `~/.energy-dash`.
    pub state_dir: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            success_visible_ms: 1500,
            success_fade_ms: 350,
            default_model_label: DEFAULT_MODEL_LABEL.to_string(),
            state_dir: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// [export]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name written by `export`.
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_EXPORT_FILE.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when no env filter is set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl DashConfig {
    /// Annotated TOML written by `energy-dash config init`.
    pub fn default_toml() -> String {
        format!(
            r#"# energy-dash configuration
#
# Values here override the built-in defaults. A `.energy-dash.toml` in the
# working directory overrides this file, and ENERGY_DASH_* environment
# variables override both.

[api]
# Base URL of the prediction service.
base_url = "{DEFAULT_API_URL}"
# Request timeout in milliseconds (0 = transport default).
timeout_ms = 0

[ui]
# Success indicator timings (milliseconds).
success_visible_ms = 1500
success_fade_ms = 350
# Label shown when the service omits `model_used`.
default_model_label = "{DEFAULT_MODEL_LABEL}"
# Where preferences.toml lives (empty = ~/.energy-dash).
state_dir = ""

[export]
file_name = "{DEFAULT_EXPORT_FILE}"

[logging]
# tracing filter, e.g. "info" or "energy_dash=debug".
level = "warn"
"#
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
