//! In-memory prediction history, most recent first.
//!
//! The ledger only grows through successful predictions and only shrinks via
//! [`History::clear`]. It is never persisted.

pub mod export;

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::form::Reading;
use crate::predict::Prediction;

/// Display format for history timestamps (client local time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column headers, shared by the table view and the CSV export.
pub const COLUMNS: [&str; 5] = ["timestamp", "energy", "temp", "humidity", "predicted"];

/// One past prediction and the reading that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Client-side local time of the success, already formatted.
    pub timestamp: String,
    pub energy: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub predicted: f64,
}

impl HistoryEntry {
    /// The row as displayed: timestamp plus four two-decimal numbers.
    pub fn row(&self) -> [String; 5] {
        [
            self.timestamp.clone(),
            format!("{:.2}", self.energy),
            format!("{:.2}", self.temperature),
            format!("{:.2}", self.humidity),
            format!("{:.2}", self.predicted),
        ]
    }
}

/// Append-only (at the front) ledger of predictions.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an entry for a successful prediction made at `now`.
    pub fn record(&mut self, reading: &Reading, prediction: &Prediction, now: DateTime<Local>) {
        self.entries.push_front(HistoryEntry {
            timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
            energy: reading.energy,
            temperature: reading.temperature,
            humidity: reading.humidity,
            predicted: prediction.predicted_energy,
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Display rows, most recent first.
    pub fn rows(&self) -> Vec<[String; 5]> {
        self.entries.iter().map(HistoryEntry::row).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
