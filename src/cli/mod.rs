//! CLI command implementations for energy-dash.
//!
//! Provides subcommand handlers for:
//! - `energy-dash dash`: interactive dashboard (see [`interactive`])
//! - `energy-dash predict`: one-shot next-hour prediction
//! - `energy-dash forecast` / `multistep`: longer-horizon forecasts
//! - `energy-dash health`: service and local config status
//! - `energy-dash theme show|toggle|set`: theme preference
//! - `energy-dash config show|init|set|reset`: configuration management

pub mod interactive;
pub mod paint;

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::{self, DashConfig};
use crate::dashboard::{Dashboard, View};
use crate::form::{self, FormInput, Reading};
use crate::predict::{HttpPredictor, PredictError, Predictor};
use crate::theme::{FileStore, MemoryStore, PreferenceStore, Theme, ThemeManager};

/// Output format for forecast commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared setup
// ---------------------------------------------------------------------------

/// Open the persisted theme, falling back to a volatile store when there is
/// no usable state directory.
pub fn open_theme(config: &DashConfig) -> ThemeManager {
    let store: Box<dyn PreferenceStore + Send> = match config::preferences_dir(config) {
        Some(dir) => Box::new(FileStore::in_dir(dir)),
        None => {
            tracing::warn!("no home directory; theme will not be remembered");
            Box::new(MemoryStore::new())
        }
    };
    ThemeManager::load(store)
}

fn build_dashboard(config: &DashConfig, predictor: &HttpPredictor) -> Dashboard {
    Dashboard::new(config, open_theme(config), predictor.predict_url())
}

fn validate_args(form: &FormInput) -> Result<Reading> {
    form::validate(form).map_err(|e| anyhow::anyhow!("{e}"))
}

// ---------------------------------------------------------------------------
// energy-dash dash
// ---------------------------------------------------------------------------

/// Launch the interactive dashboard on stdin/stdout.
pub fn run_dash(config: &DashConfig) -> Result<()> {
    let predictor = HttpPredictor::from_config(config);
    let dash = build_dashboard(config, &predictor);
    interactive::run(dash, Arc::new(predictor))
}

// ---------------------------------------------------------------------------
// energy-dash predict
// ---------------------------------------------------------------------------

/// One-shot prediction: validate, call the service once, print the card.
pub fn run_predict(config: &DashConfig, input: FormInput) -> Result<()> {
    let predictor = HttpPredictor::from_config(config);
    let mut dash = build_dashboard(config, &predictor);
    let view = predict_once(&mut dash, input, &predictor)?;
    print!("{}", paint::result_card(&view));
    Ok(())
}

/// Submit `input` once. A failure comes back as the dashboard's error line
/// and nothing is painted for it.
fn predict_once(dash: &mut Dashboard, input: FormInput, predictor: &dyn Predictor) -> Result<View> {
    dash.form = input;
    dash.predict_with(predictor);
    if let Some(err) = dash.error() {
        anyhow::bail!("{err}");
    }
    Ok(dash.view())
}

// ---------------------------------------------------------------------------
// energy-dash forecast / multistep
// ---------------------------------------------------------------------------

/// Print the 24 chained hourly predictions.
pub fn run_forecast(config: &DashConfig, input: FormInput, format: OutputFormat) -> Result<()> {
    let reading = validate_args(&input)?;
    let client = HttpPredictor::from_config(config);
    let values = client.forecast_24h(&reading).map_err(log_failure)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "forecast_24h": values }))?);
        }
        OutputFormat::Csv => {
            println!("hour,predicted");
            for (i, v) in values.iter().enumerate() {
                println!("{},{:.2}", i + 1, v);
            }
        }
        OutputFormat::Table => {
            println!("{}", "24h Forecast".bold().cyan());
            println!("{}", "=".repeat(30));
            println!("  {:>6} {:>12}", "Hour", "Predicted");
            println!("  {}", "-".repeat(19));
            for (i, v) in values.iter().enumerate() {
                let line = format!("  {:>6} {:>12.2}", format!("+{}h", i + 1), v);
                if i % 2 == 0 {
                    println!("{line}");
                } else {
                    println!("{}", line.dimmed());
                }
            }
        }
    }
    Ok(())
}

/// Print predictions at the service's fixed horizons.
pub fn run_multistep(config: &DashConfig, input: FormInput, format: OutputFormat) -> Result<()> {
    let reading = validate_args(&input)?;
    let client = HttpPredictor::from_config(config);
    let horizons = client.multistep(&reading).map_err(log_failure)?;
    let ordered = order_horizons(&horizons);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&horizons)?),
        OutputFormat::Csv => {
            println!("horizon,predicted");
            for (h, v) in &ordered {
                println!("{h},{v:.2}");
            }
        }
        OutputFormat::Table => {
            println!("{}", "Multi-step Forecast".bold().cyan());
            println!("{}", "=".repeat(30));
            for (h, v) in &ordered {
                println!("  {:<8} {:>12.2}", h.bold(), v);
            }
        }
    }
    Ok(())
}

/// Sort horizon keys like `"3h"`, `"12h"` numerically rather than lexically.
fn order_horizons(horizons: &BTreeMap<String, f64>) -> Vec<(&str, f64)> {
    let mut ordered: Vec<(&str, f64)> = horizons.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    ordered.sort_by_key(|(k, _)| {
        k.trim_end_matches('h')
            .parse::<u32>()
            .unwrap_or(u32::MAX)
    });
    ordered
}

fn log_failure(e: PredictError) -> anyhow::Error {
    tracing::error!(error = %e, "forecast request failed");
    anyhow::anyhow!("{}", e.user_message())
}

// ---------------------------------------------------------------------------
// energy-dash health
// ---------------------------------------------------------------------------

/// Check service reachability and local configuration.
pub fn run_health(config: &DashConfig) -> Result<()> {
    println!("{}", "energy-dash Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.energy-dash/config.toml found"
        } else {
            "not found (run `energy-dash config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".energy-dash.toml found"
        } else {
            "none (optional)"
        },
    );

    let theme = open_theme(config);
    print_health_item("Theme", true, theme.current().as_str());

    let client = HttpPredictor::from_config(config);
    match client.health() {
        Ok(status) => {
            let running = status.status == "running";
            print_health_item(
                "Prediction service",
                running,
                &format!("{} at {}", status.status, client.base_url()),
            );
            let model = status.model.unwrap_or_else(|| "unknown".to_string());
            print_health_item("Model", model != "unknown", &model);
        }
        Err(e) => {
            tracing::debug!(error = %e, "health check failed");
            print_health_item(
                "Prediction service",
                false,
                &format!("not reachable at {} ({e})", client.base_url()),
            );
        }
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<20} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// energy-dash theme
// ---------------------------------------------------------------------------

/// Theme subcommand actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    Show,
    Toggle,
    Set(Theme),
}

pub fn run_theme(config: &DashConfig, action: ThemeAction) -> Result<()> {
    let mut manager = open_theme(config);
    let theme = match action {
        ThemeAction::Show => manager.current(),
        ThemeAction::Toggle => manager.toggle(),
        ThemeAction::Set(theme) => manager.set(theme),
    };
    match action {
        ThemeAction::Show => println!("{theme}"),
        _ => println!("{} Theme set to {}", "✓".green().bold(), theme.to_string().bold()),
    }
    Ok(())
}

/// clap value parser for `light` / `dark`.
pub fn parse_theme(s: &str) -> std::result::Result<Theme, String> {
    Theme::parse(&s.to_ascii_lowercase()).ok_or_else(|| format!("expected 'light' or 'dark', got '{s}'"))
}

// ---------------------------------------------------------------------------
// energy-dash config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective energy-dash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.energy-dash/config.toml", global_exists);
    print_source(".energy-dash.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "ENERGY_DASH_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.energy-dash/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} Config written to {}", "✓".green().bold(), path.display());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value).with_context(|| format!("could not set {key}"))?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
