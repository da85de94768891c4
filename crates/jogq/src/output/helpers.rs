//! Common helper functions for output formatting.

use chrono::{DateTime, FixedOffset};
use jogq_core::Value;
use owo_colors::OwoColorize;

/// Widest a table column is allowed to grow.
pub const MAX_COLUMN_WIDTH: usize = 30;

/// How timestamps are rendered in tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFormat {
    /// Full RFC 3339, e.g. `2016-05-01T07:30:00+02:00`.
    #[default]
    Iso,
    /// `2016-05-01 07:30`.
    Short,
    /// `2016-05-01`.
    Date,
}

impl DateFormat {
    /// Reads the `output.date_format` setting. Unknown values fall back to ISO.
    pub fn from_config(value: Option<&str>) -> Self {
        match value {
            Some("short") => DateFormat::Short,
            Some("date") => DateFormat::Date,
            _ => DateFormat::Iso,
        }
    }

    fn render(self, ts: &DateTime<FixedOffset>) -> String {
        match self {
            DateFormat::Iso => ts.to_rfc3339(),
            DateFormat::Short => ts.format("%Y-%m-%d %H:%M").to_string(),
            DateFormat::Date => ts.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Renders a field value as plain table text.
pub fn format_value(value: Option<&Value>, date_format: DateFormat) -> String {
    match value {
        None => String::new(),
        Some(Value::Timestamp(ts)) => date_format.render(ts),
        Some(other) => other.to_string(),
    }
}

/// Pads `text` to `width` and applies the color for the value's type.
///
/// Padding happens before coloring so escape codes do not skew alignment.
pub fn pad_cell(text: &str, width: usize, value: Option<&Value>, use_colors: bool) -> String {
    let padded = format!("{text:<width$}");
    if !use_colors {
        return padded;
    }
    match value {
        Some(Value::Null) => padded.dimmed().to_string(),
        Some(Value::Number(_)) => padded.cyan().to_string(),
        Some(Value::Bool(true)) => padded.green().to_string(),
        Some(Value::Bool(false)) => padded.red().to_string(),
        _ => padded,
    }
}

/// Formats an average with two decimals.
pub fn format_average(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("runner@example.com", 10), "runner@...");
        assert_eq!(truncate_str("ÄÖÜäöüßÄÖÜ", 5), "ÄÖ...");
    }

    #[test]
    fn test_date_format_from_config() {
        assert_eq!(DateFormat::from_config(None), DateFormat::Iso);
        assert_eq!(DateFormat::from_config(Some("short")), DateFormat::Short);
        assert_eq!(DateFormat::from_config(Some("date")), DateFormat::Date);
        assert_eq!(DateFormat::from_config(Some("bogus")), DateFormat::Iso);
    }

    #[test]
    fn test_format_value() {
        let ts =
            Value::Timestamp(DateTime::parse_from_rfc3339("2016-05-01T07:30:00+02:00").unwrap());
        assert_eq!(format_value(Some(&ts), DateFormat::Short), "2016-05-01 07:30");
        assert_eq!(format_value(Some(&ts), DateFormat::Date), "2016-05-01");
        assert_eq!(
            format_value(Some(&ts), DateFormat::Iso),
            "2016-05-01T07:30:00+02:00"
        );
        assert_eq!(format_value(Some(&Value::Number(2.5)), DateFormat::Iso), "2.5");
        assert_eq!(format_value(Some(&Value::Null), DateFormat::Iso), "null");
        assert_eq!(format_value(None, DateFormat::Iso), "");
    }

    #[test]
    fn test_pad_cell_without_colors() {
        assert_eq!(pad_cell("1", 3, Some(&Value::Number(1.0)), false), "1  ");
    }

    #[test]
    fn test_format_average() {
        assert_eq!(format_average(15.0), "15.00");
        assert_eq!(format_average(3.333), "3.33");
    }
}
