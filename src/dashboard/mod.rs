//! Dashboard controller.
//!
//! [`Dashboard`] owns every piece of mutable UI state: the form, the theme,
//! the inline error, the result panel, the success indicator and the history
//! ledger. Front ends feed it user actions and request completions, then
//! redraw from [`Dashboard::view`].
//!
//! # Request generations
//!
//! Each predict action is tagged with a monotonically increasing generation.
//! Completions from anything but the latest generation are dropped, so a
//! slow earlier request can never overwrite a newer result or insert an
//! out-of-order history row.

pub mod indicator;
pub mod view;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::config::DashConfig;
use crate::form::{self, FormInput, Reading};
use crate::history::{History, export};
use crate::predict::{PredictError, Prediction, Predictor};
use crate::theme::{Theme, ThemeManager};

pub use indicator::{IndicatorPhase, SuccessIndicator};
pub use view::{ResultView, View};

/// A validated reading that should be sent to the service.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub generation: u64,
    pub reading: Reading,
}

/// The answer to a [`PendingRequest`].
#[derive(Debug, Clone)]
pub struct Completion {
    pub generation: u64,
    pub reading: Reading,
    pub result: Result<Prediction, PredictError>,
}

impl PendingRequest {
    /// Run the request against `predictor` on the current thread.
    pub fn run(self, predictor: &dyn Predictor) -> Completion {
        let result = predictor.predict(&self.reading);
        Completion {
            generation: self.generation,
            reading: self.reading,
            result,
        }
    }
}

/// What applying a completion did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Result rendered and a history row added.
    Rendered,
    /// The request failed; the generic failure message is shown.
    Failed,
    /// A newer request was issued since; nothing changed.
    Stale,
}

/// All dashboard state plus the operations that mutate it.
#[derive(Debug)]
pub struct Dashboard {
    pub form: FormInput,
    theme: ThemeManager,
    endpoint: String,
    default_model: String,
    export_file: String,
    error: Option<String>,
    result: Option<ResultView>,
    indicator: SuccessIndicator,
    history: History,
    issued: u64,
    pending: Option<u64>,
}

impl Dashboard {
    pub fn new(config: &DashConfig, theme: ThemeManager, endpoint: impl Into<String>) -> Self {
        Self {
            form: FormInput::default(),
            theme,
            endpoint: endpoint.into(),
            default_model: config.ui.default_model_label.clone(),
            export_file: config.export.file_name.clone(),
            error: None,
            result: None,
            indicator: SuccessIndicator::new(
                Duration::from_millis(config.ui.success_visible_ms),
                Duration::from_millis(config.ui.success_fade_ms),
            ),
            history: History::new(),
            issued: 0,
            pending: None,
        }
    }

    // -- Predict --

    /// Start a predict action.
    ///
    /// Clears the error line and validates the form. On a validation error
    /// the message is shown and `None` is returned: no request may be sent.
    pub fn begin_predict(&mut self) -> Option<PendingRequest> {
        self.error = None;

        let reading = match form::validate(&self.form) {
            Ok(reading) => reading,
            Err(e) => {
                tracing::debug!(error = %e, "form rejected");
                self.error = Some(e.to_string());
                return None;
            }
        };

        self.issued += 1;
        self.pending = Some(self.issued);
        tracing::info!(
            generation = self.issued,
            energy = reading.energy,
            temperature = reading.temperature,
            humidity = reading.humidity,
            "prediction requested"
        );

        Some(PendingRequest {
            generation: self.issued,
            reading,
        })
    }

    /// Apply a finished request. `now` drives the success indicator and
    /// `wall` stamps the history row.
    pub fn complete(&mut self, completion: Completion, now: Instant, wall: DateTime<Local>) -> Applied {
        if completion.generation != self.issued {
            tracing::debug!(
                generation = completion.generation,
                latest = self.issued,
                "dropping stale prediction"
            );
            return Applied::Stale;
        }
        self.pending = None;

        match completion.result {
            Ok(prediction) => {
                self.result = Some(ResultView::render(
                    &prediction,
                    completion.reading.timestamp.as_deref(),
                    &self.default_model,
                ));
                self.indicator.trigger(now);
                self.history.record(&completion.reading, &prediction, wall);
                tracing::info!(
                    generation = completion.generation,
                    predicted = prediction.predicted_energy,
                    "prediction rendered"
                );
                Applied::Rendered
            }
            Err(e) => {
                tracing::error!(generation = completion.generation, error = %e, "prediction failed");
                self.error = Some(e.user_message().to_string());
                Applied::Failed
            }
        }
    }

    /// Validate, call `predictor` synchronously, and apply the result.
    pub fn predict_with(&mut self, predictor: &dyn Predictor) -> Option<Applied> {
        let request = self.begin_predict()?;
        let completion = request.run(predictor);
        Some(self.complete(completion, Instant::now(), Local::now()))
    }

    // -- Other actions --

    /// Blank the form and the error line.
    pub fn clear_inputs(&mut self) {
        self.form.clear();
        self.error = None;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Write the ledger as CSV into `dir`.
    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        export::export(&self.history, dir, &self.export_file)
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle()
    }

    /// Advance timers. Returns whether anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.indicator.tick(now)
    }

    /// When [`Self::tick`] next needs to run.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.indicator.next_deadline()
    }

    // -- Accessors --

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&ResultView> {
        self.result.as_ref()
    }

    /// Build a render snapshot of the current state.
    pub fn view(&self) -> View {
        View {
            theme: self.theme.current(),
            endpoint: self.endpoint.clone(),
            form: self.form.clone(),
            error: self.error.clone(),
            result: self.result.clone(),
            indicator: self.indicator.phase(),
            pending: self.pending.is_some(),
            history: self.history.rows(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
