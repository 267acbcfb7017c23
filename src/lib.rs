//! Terminal dashboard for next-hour energy predictions.
//!
//! Collects a reading (current usage, temperature, humidity), asks a remote
//! prediction service for the next hour's usage, and keeps a session
//! history that can be exported as CSV.

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod form;
pub mod history;
pub mod logging;
pub mod predict;
pub mod theme;
