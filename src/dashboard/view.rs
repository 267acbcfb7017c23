//! Render snapshots of the dashboard state.
//!
//! Everything here is plain data derived from [`super::Dashboard`]; painters
//! redraw from a fresh [`View`] after every mutation.

use crate::form::FormInput;
use crate::predict::Prediction;
use crate::theme::Theme;

use super::indicator::IndicatorPhase;

/// Meta label used when neither the service nor the user gave a timestamp.
pub const META_PLACEHOLDER: &str = "--";

/// Contents of the result panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    /// Prediction with two decimals.
    pub value: String,
    /// Server timestamp, else the user's, else [`META_PLACEHOLDER`].
    pub meta: String,
    pub model: String,
}

impl ResultView {
    pub fn render(prediction: &Prediction, user_timestamp: Option<&str>, default_model: &str) -> Self {
        let meta = prediction
            .timestamp
            .as_deref()
            .or(user_timestamp)
            .unwrap_or(META_PLACEHOLDER)
            .to_string();

        Self {
            value: format!("{:.2}", prediction.predicted_energy),
            meta,
            model: prediction
                .model_used
                .clone()
                .unwrap_or_else(|| default_model.to_string()),
        }
    }
}

/// Complete render snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub theme: Theme,
    pub endpoint: String,
    pub form: FormInput,
    /// Inline error line, if any.
    pub error: Option<String>,
    /// `None` while the result panel is hidden.
    pub result: Option<ResultView>,
    pub indicator: IndicatorPhase,
    /// Whether a request is still outstanding.
    pub pending: bool,
    pub history: Vec<[String; 5]>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
