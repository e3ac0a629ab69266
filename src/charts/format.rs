//! Slice text and hover text formatting.

use serde::Serialize;

/// What each ring segment shows as its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelFormat {
    /// `46%`
    Percent { decimals: usize },
    /// `Wetland` over `46%`
    LabelAndPercent { decimals: usize },
    /// `12,345 ha`
    Value,
    /// `46%` over `12,345 ha`
    PercentAndValue { decimals: usize },
}

impl LabelFormat {
    /// Render the slice text. Lines are separated by `\n`.
    pub fn render(&self, label: &str, value: f64, fraction: f64) -> String {
        match *self {
            LabelFormat::Percent { decimals } => format_percent(fraction, decimals),
            LabelFormat::LabelAndPercent { decimals } => {
                format!("{}\n{}", label, format_percent(fraction, decimals))
            }
            LabelFormat::Value => format!("{} ha", format_value(value)),
            LabelFormat::PercentAndValue { decimals } => format!(
                "{}\n{} ha",
                format_percent(fraction, decimals),
                format_value(value)
            ),
        }
    }
}

/// Format a 0..=1 fraction as a percentage with fixed decimals.
///
/// Ties round half up (12.5% shows as 13%), not to even.
pub fn format_percent(fraction: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (fraction * 100.0 * scale).round() / scale;
    format!("{:.*}%", decimals, rounded)
}

/// Format a hectare value: whole numbers without decimals, others to at most
/// two decimals with trailing zeros dropped. Integer parts of five or more
/// digits are comma-grouped; shorter ones are left as is (`5894`, `12,345`).
pub fn format_value(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((&text, ""));
    let frac_part = frac_part.trim_end_matches('0');

    let group = int_part.len() > 4;
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if group && i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

/// Hover text for one slice: label, percent, and total area.
pub fn hover_text(label: &str, value: f64, fraction: f64) -> String {
    format!(
        "{}\n{}\nTotal: {} ha",
        label,
        format_percent(fraction, 0),
        format_value(value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_to_requested_decimals() {
        assert_eq!(format_percent(0.4567, 0), "46%");
        assert_eq!(format_percent(0.4567, 1), "45.7%");
        assert_eq!(format_percent(1.0, 0), "100%");
        assert_eq!(format_percent(0.003, 0), "0%");
    }

    #[test]
    fn percent_ties_round_half_up() {
        assert_eq!(format_percent(0.125, 0), "13%");
        assert_eq!(format_percent(0.625, 0), "63%");
        assert_eq!(format_percent(0.005, 0), "1%");
        assert_eq!(format_percent(0.375, 0), "38%");
    }

    #[test]
    fn values_group_thousands_and_trim_zeros() {
        assert_eq!(format_value(12345.0), "12,345");
        assert_eq!(format_value(5894.0), "5894");
        assert_eq!(format_value(1000.5), "1000.5");
        assert_eq!(format_value(1234567.25), "1,234,567.25");
        assert_eq!(format_value(12.5), "12.5");
        assert_eq!(format_value(999.0), "999");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(10.004), "10");
    }

    #[test]
    fn label_formats() {
        let f = 0.25;
        assert_eq!(LabelFormat::Percent { decimals: 0 }.render("Wetland", 500.0, f), "25%");
        assert_eq!(
            LabelFormat::LabelAndPercent { decimals: 0 }.render("Wetland", 500.0, f),
            "Wetland\n25%"
        );
        assert_eq!(LabelFormat::Value.render("Wetland", 1500.0, f), "1500 ha");
        assert_eq!(
            LabelFormat::PercentAndValue { decimals: 1 }.render("Wetland", 500.0, f),
            "25.0%\n500 ha"
        );
    }

    #[test]
    fn hover_has_three_lines() {
        let text = hover_text("Cropland", 2048.0, 0.512);
        assert_eq!(text, "Cropland\n51%\nTotal: 2048 ha");
    }
}
