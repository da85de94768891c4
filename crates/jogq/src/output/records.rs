//! Record output formatting.

use jogq_core::Record;
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{format_value, pad_cell, truncate_str, DateFormat, MAX_COLUMN_WIDTH};

/// JSON output structure for the filter command.
#[derive(Serialize)]
pub struct FilterOutput<'a> {
    /// Canonical form of the compiled query.
    pub query: String,
    /// Number of records read.
    pub total: usize,
    /// Number of records that matched, before `--limit`.
    pub matched: usize,
    pub records: &'a [&'a Record],
}

/// Formats filtered records as JSON.
pub fn format_records_json(output: &FilterOutput<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(output)
}

/// Column order: `id` first, then fields in order of first appearance.
fn columns(records: &[&Record]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for name in record.field_names() {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
    }
    if let Some(pos) = columns.iter().position(|c| c == "id") {
        let id = columns.remove(pos);
        columns.insert(0, id);
    }
    columns
}

/// Formats records as a table.
pub fn format_records_table(
    records: &[&Record],
    date_format: DateFormat,
    use_colors: bool,
) -> String {
    if records.is_empty() {
        return "No records matched.\n".to_string();
    }

    let columns = columns(records);
    let cells: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| truncate_str(&format_value(record.get(c), date_format), MAX_COLUMN_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut output = String::new();

    // Header
    let header = columns
        .iter()
        .zip(&widths)
        .map(|(name, width)| format!("{name:<width$}"))
        .collect::<Vec<_>>()
        .join(" ");
    let header = header.trim_end();
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(header);
        output.push('\n');
    }

    // Rows
    for (record, row) in records.iter().zip(&cells) {
        let line = columns
            .iter()
            .zip(row)
            .zip(&widths)
            .map(|((name, text), width)| pad_cell(text, *width, record.get(name), use_colors))
            .collect::<Vec<_>>()
            .join(" ");
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}

/// One-line summary printed under the table.
pub fn format_summary(shown: usize, matched: usize, total: usize) -> String {
    if shown < matched {
        format!("{shown} of {matched} matching records shown ({total} total)\n")
    } else {
        format!("{matched} of {total} records matched\n")
    }
}
