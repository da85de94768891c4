//! Weekly report output formatting.

use jogq_core::WeeklyReport;
use owo_colors::OwoColorize;

use super::helpers::format_average;

/// Formats a weekly report as JSON.
pub fn format_report_json(report: &WeeklyReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Formats a weekly report for the terminal.
pub fn format_report_table(report: &WeeklyReport, use_colors: bool) -> String {
    let header = format!(
        "Week {} to {}",
        report.start_of_week.format("%Y-%m-%d"),
        report.end_of_week.format("%Y-%m-%d")
    );

    let mut output = String::new();
    if use_colors {
        output.push_str(&format!("{}\n", header.bold()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }
    output.push_str(&format!(
        "  Average speed:    {}\n",
        format_average(report.average_speed)
    ));
    output.push_str(&format!(
        "  Average distance: {}\n",
        format_average(report.average_distance)
    ));
    output
}
