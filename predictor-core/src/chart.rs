//! Bar-chart data shown next to a prediction.

use crate::model::{FormField, FormState, parse_leading_number};

pub const CHART_TITLE: &str = "Weather Parameters and Predicted Temperature";
pub const DATASET_LABEL: &str = "Weather Parameters";
pub const X_AXIS_TITLE: &str = "Parameters";
pub const Y_AXIS_TITLE: &str = "Value (Normalized)";

pub const LABELS: [&str; 7] = [
    "Temperature (°C)",
    "Wind (mph)",
    "Pressure (mb)",
    "Humidity (%)",
    "Cloud (%)",
    "Visibility (km)",
    "Gust (mph)",
];

/// Bar colours, one per label, as RGB.
pub const COLORS: [(u8, u8, u8); 7] = [
    (34, 197, 94),
    (59, 130, 246),
    (168, 85, 247),
    (234, 179, 8),
    (239, 68, 68),
    (6, 182, 212),
    (236, 72, 153),
];

/// Pressure is shifted by this many mb before scaling.
const PRESSURE_OFFSET_MB: f64 = 950.0;
const PRESSURE_SPAN_MB: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    pub labels: [&'static str; 7],
    /// Empty when there is no prediction, otherwise one value per label.
    pub values: Vec<f64>,
}

impl ChartDataset {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// (label, value, colour) per bar.
    pub fn bars(&self) -> impl Iterator<Item = (&'static str, f64, (u8, u8, u8))> + '_ {
        self.labels
            .iter()
            .zip(self.values.iter())
            .zip(COLORS.iter())
            .map(|((label, value), color)| (*label, *value, *color))
    }
}

/// Numeric value of a field for charting; anything unparseable counts as 0.
fn chart_value(form: &FormState, field: FormField) -> f64 {
    parse_leading_number(form.get(field)).unwrap_or(0.0)
}

fn normalized_pressure(form: &FormState) -> f64 {
    let scaled = parse_leading_number(form.get(FormField::PressureMb))
        .map(|p| (p - PRESSURE_OFFSET_MB) / PRESSURE_SPAN_MB * 100.0)
        .unwrap_or(0.0);
    if scaled.is_finite() { scaled } else { 0.0 }
}

/// Build the chart for the current form and prediction.
pub fn derive_chart(form: &FormState, prediction: Option<f64>) -> ChartDataset {
    let values = match prediction {
        None => Vec::new(),
        Some(temperature) => vec![
            temperature,
            chart_value(form, FormField::WindMph),
            normalized_pressure(form),
            chart_value(form, FormField::Humidity),
            chart_value(form, FormField::Cloud),
            chart_value(form, FormField::VisibilityKm),
            chart_value(form, FormField::GustMph),
        ],
    };

    ChartDataset { labels: LABELS, values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_form() -> FormState {
        FormState::new()
            .with(FormField::WindMph, "10")
            .with(FormField::PressureMb, "1013")
            .with(FormField::Humidity, "70")
            .with(FormField::Cloud, "50")
            .with(FormField::VisibilityKm, "10")
            .with(FormField::GustMph, "20")
    }

    #[test]
    fn no_prediction_means_labels_without_bars() {
        let chart = derive_chart(&sample_form(), None);
        assert!(chart.is_empty());
        assert_eq!(chart.labels, LABELS);
        assert_eq!(chart.bars().count(), 0);
    }

    #[test]
    fn derives_seven_values_in_label_order() {
        let chart = derive_chart(&sample_form(), Some(21.5));
        assert_eq!(chart.values, vec![21.5, 10.0, 63.0, 70.0, 50.0, 10.0, 20.0]);
    }

    #[test]
    fn unparseable_field_charts_as_zero() {
        let form = sample_form().with(FormField::WindMph, "abc");
        let chart = derive_chart(&form, Some(21.5));
        assert_eq!(chart.values[1], 0.0);
        assert_eq!(chart.values[0], 21.5);
    }

    #[test]
    fn empty_pressure_charts_as_zero_not_minus_950() {
        let form = sample_form().with(FormField::PressureMb, "");
        let chart = derive_chart(&form, Some(5.0));
        assert_eq!(chart.values[2], 0.0);
    }

    #[test]
    fn trailing_text_is_ignored() {
        let form = sample_form().with(FormField::GustMph, "25 mph");
        assert_eq!(derive_chart(&form, Some(1.0)).values[6], 25.0);
    }

    #[test]
    fn bars_pair_labels_values_and_colours() {
        let chart = derive_chart(&sample_form(), Some(21.5));
        let first = chart.bars().next().unwrap();
        assert_eq!(first, ("Temperature (°C)", 21.5, (34, 197, 94)));
        assert_eq!(chart.bars().count(), 7);
    }
}
