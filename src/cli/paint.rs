//! Terminal painting of dashboard views.
//!
//! Pure functions from a [`View`] to a string. The theme picks the palette;
//! nothing here touches dashboard state.

use std::fmt::Write;

use colored::{Color, Colorize};

use crate::dashboard::{IndicatorPhase, View};
use crate::history::COLUMNS;
use crate::theme::Theme;

/// Colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,
    pub text: Color,
    pub success: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                accent: Color::Blue,
                text: Color::Black,
                success: Color::Green,
                error: Color::Red,
            },
            Theme::Dark => Self {
                accent: Color::BrightCyan,
                text: Color::BrightWhite,
                success: Color::BrightGreen,
                error: Color::BrightRed,
            },
        }
    }
}

const RULE_WIDTH: usize = 64;

/// The full dashboard screen.
pub fn screen(view: &View) -> String {
    let p = Palette::for_theme(view.theme);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}  {}",
        "Energy Prediction Dashboard".bold().color(p.accent),
        format!("[{} theme]", view.theme).dimmed()
    );
    let _ = writeln!(out, "{} {}", "API:".dimmed(), view.endpoint.dimmed());
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    out.push_str(&form_section(view, p));
    out.push('\n');
    out.push_str(&result_card(view));
    out.push('\n');
    out.push_str(&history_table(view, p));

    out
}

fn form_section(view: &View, p: Palette) -> String {
    let mut out = String::new();
    let fields = [
        ("energy", view.form.energy.as_str(), "current usage (kWh)"),
        ("temp", view.form.temperature.as_str(), "temperature (°C)"),
        ("hum", view.form.humidity.as_str(), "humidity (%)"),
        ("ts", view.form.timestamp.as_str(), "timestamp (optional)"),
    ];
    for (name, value, hint) in fields {
        let shown = if value.is_empty() {
            hint.dimmed().to_string()
        } else {
            value.color(p.text).to_string()
        };
        let _ = writeln!(out, "  {:<8} {}", name.bold(), shown);
    }
    out
}

/// Error line, pending marker, and the result panel when visible.
pub fn result_card(view: &View) -> String {
    let p = Palette::for_theme(view.theme);
    let mut out = String::new();

    if let Some(err) = &view.error {
        let _ = writeln!(out, "  {} {}", "✗".color(p.error).bold(), err.color(p.error));
    }
    if view.pending {
        let _ = writeln!(out, "  {}", "… waiting for prediction".dimmed());
    }

    let Some(result) = &view.result else {
        return out;
    };

    let check = match view.indicator {
        IndicatorPhase::Visible => format!("  {}", "✓".color(p.success).bold()),
        IndicatorPhase::Fading => format!("  {}", "✓".color(p.success).dimmed()),
        IndicatorPhase::Hidden => String::new(),
    };
    let _ = writeln!(out, "{}", "Prediction".bold().color(p.accent));
    let _ = writeln!(
        out,
        "  {:<12} {}{}",
        "Next hour:".bold(),
        result.value.color(p.text).bold(),
        check
    );
    let _ = writeln!(out, "  {:<12} {}", "Timestamp:".bold(), result.meta);
    let _ = writeln!(out, "  {:<12} {}", "Model:".bold(), result.model);
    out
}

fn history_table(view: &View, p: Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        "History".bold().color(p.accent),
        format!("({})", view.history.len()).dimmed()
    );
    if view.history.is_empty() {
        let _ = writeln!(out, "  {}", "No predictions yet.".dimmed());
        return out;
    }

    let _ = writeln!(
        out,
        "  {:<20} {:>10} {:>8} {:>9} {:>10}",
        COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3], COLUMNS[4]
    );
    let _ = writeln!(out, "  {}", "-".repeat(RULE_WIDTH - 2));
    for (i, row) in view.history.iter().enumerate() {
        let line = format!(
            "  {:<20} {:>10} {:>8} {:>9} {:>10}",
            row[0], row[1], row[2], row[3], row[4]
        );
        if i % 2 == 0 {
            let _ = writeln!(out, "{line}");
        } else {
            let _ = writeln!(out, "{}", line.dimmed());
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::ResultView;
    use crate::form::FormInput;

    fn view() -> View {
        View {
            theme: Theme::Light,
            endpoint: "http://127.0.0.1:8000/api/predict".into(),
            form: FormInput::new("10", "25", "40"),
            error: None,
            result: None,
            indicator: IndicatorPhase::Hidden,
            pending: false,
            history: Vec::new(),
        }
    }

    #[test]
    fn hidden_panel_is_not_drawn() {
        let card = result_card(&view());
        assert!(!card.contains("Next hour"));
    }

    #[test]
    fn result_panel_shows_labels() {
        let mut v = view();
        v.result = Some(ResultView {
            value: "12.35".into(),
            meta: "--".into(),
            model: "xgboost".into(),
        });
        v.indicator = IndicatorPhase::Visible;
        let card = result_card(&v);
        assert!(card.contains("12.35"));
        assert!(card.contains("xgboost"));
        assert!(card.contains('✓'));
    }

    #[test]
    fn error_line_is_drawn() {
        let mut v = view();
        v.error = Some("Enter humidity.".into());
        assert!(result_card(&v).contains("Enter humidity."));
    }

    #[test]
    fn history_rows_are_listed_in_order() {
        let mut v = view();
        v.history = vec![
            ["b".into(), "2.00".into(), "0.00".into(), "0.00".into(), "2.50".into()],
            ["a".into(), "1.00".into(), "0.00".into(), "0.00".into(), "1.50".into()],
        ];
        let s = screen(&v);
        let b = s.find("2.50").unwrap();
        let a = s.find("1.50").unwrap();
        assert!(b < a);
    }

    #[test]
    fn palettes_differ_by_theme() {
        assert_ne!(Palette::for_theme(Theme::Light), Palette::for_theme(Theme::Dark));
    }
}
