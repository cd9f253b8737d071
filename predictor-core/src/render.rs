//! What the user sees for a given outcome, and a plain-text rendering of it.

use std::fmt::Write as _;

use crate::{
    FormState, RequestOutcome,
    chart::{self, ChartDataset, derive_chart},
};

pub const SUBMIT_LABEL: &str = "Predict Temperature";
pub const SUBMIT_BUSY_LABEL: &str = "Predicting...";

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub prediction_panel: Option<String>,
    pub error_panel: Option<String>,
    pub chart: Option<ChartDataset>,
}

pub fn render(outcome: &RequestOutcome, form: &FormState) -> View {
    let loading = outcome.is_loading();
    let mut view = View {
        submit_label: if loading { SUBMIT_BUSY_LABEL } else { SUBMIT_LABEL },
        submit_enabled: !loading,
        prediction_panel: None,
        error_panel: None,
        chart: None,
    };

    if let Some(p) = outcome.prediction() {
        view.prediction_panel = Some(format!("Predicted Temperature: {p}°C"));
        view.chart = Some(derive_chart(form, Some(p)));
    }
    if let Some(msg) = outcome.error() {
        view.error_panel = Some(format!("Error: {msg}"));
    }

    view
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOptions {
    /// Characters used by the longest bar.
    pub width: usize,
    /// Emit 24-bit ANSI colours for the bars.
    pub color: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self { width: crate::config::DEFAULT_CHART_WIDTH, color: false }
    }
}

impl View {
    /// Panels and chart as terminal text. Idle and loading views render to
    /// an empty string.
    pub fn to_text(&self, opts: TextOptions) -> String {
        let mut out = String::new();
        if let Some(panel) = &self.prediction_panel {
            out.push_str(panel);
            out.push('\n');
        }
        if let Some(chart) = &self.chart {
            out.push('\n');
            out.push_str(&chart_to_text(chart, opts));
        }
        if let Some(panel) = &self.error_panel {
            out.push_str(panel);
            out.push('\n');
        }
        out
    }
}

/// Horizontal bar chart. Bars are scaled to the largest magnitude; negative
/// values are drawn with a lighter shade.
pub fn chart_to_text(dataset: &ChartDataset, opts: TextOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", chart::CHART_TITLE);
    let _ = writeln!(out, "[{}]  x: {}, y: {}", chart::DATASET_LABEL, chart::X_AXIS_TITLE, chart::Y_AXIS_TITLE);

    let label_width = dataset.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    if dataset.is_empty() {
        for label in dataset.labels {
            let _ = writeln!(out, "{label:<label_width$} |");
        }
        return out;
    }

    let max_abs = dataset.values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));

    for (label, value, (r, g, b)) in dataset.bars() {
        let len = if max_abs > 0.0 {
            ((value.abs() / max_abs) * opts.width as f64).round() as usize
        } else {
            0
        };
        let glyph = if value < 0.0 { "░" } else { "█" };
        let bar = glyph.repeat(len);

        if opts.color && len > 0 {
            let _ = writeln!(out, "{label:<label_width$} |\x1b[38;2;{r};{g};{b}m{bar}\x1b[0m {value}");
        } else {
            let _ = writeln!(out, "{label:<label_width$} |{bar} {value}");
        }
    }

    out
}
