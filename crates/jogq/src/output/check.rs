//! Compiled query output formatting.

use jogq_core::filter::FilterExpr;
use owo_colors::OwoColorize;
use serde::Serialize;

/// JSON output structure for the check command.
#[derive(Serialize)]
pub struct CheckOutput<'a> {
    pub query: &'a str,
    pub canonical: String,
    pub fields: Vec<&'a str>,
}

impl<'a> CheckOutput<'a> {
    pub fn new(query: &'a str, filter: &'a FilterExpr) -> Self {
        Self {
            query,
            canonical: filter.to_string(),
            fields: filter.fields(),
        }
    }
}

/// Formats a compiled query as JSON.
pub fn format_check_json(output: &CheckOutput<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(output)
}

/// Formats a compiled query as its canonical form followed by the tree.
pub fn format_check_table(filter: &FilterExpr, use_colors: bool) -> String {
    let mut output = String::new();
    let canonical = filter.to_string();
    if use_colors {
        output.push_str(&format!("{}\n\n", canonical.green()));
    } else {
        output.push_str(&canonical);
        output.push_str("\n\n");
    }
    write_tree(filter, 0, &mut output);
    output
}

fn write_tree(filter: &FilterExpr, depth: usize, output: &mut String) {
    let indent = "  ".repeat(depth);
    match filter {
        FilterExpr::Comparison { field, op, value } => {
            output.push_str(&format!("{indent}{field} {op} {value}\n"));
        }
        FilterExpr::Not { inner } => {
            output.push_str(&format!("{indent}NOT\n"));
            write_tree(inner, depth + 1, output);
        }
        FilterExpr::And { left, right } => {
            output.push_str(&format!("{indent}AND\n"));
            write_tree(left, depth + 1, output);
            write_tree(right, depth + 1, output);
        }
        FilterExpr::Or { left, right } => {
            output.push_str(&format!("{indent}OR\n"));
            write_tree(left, depth + 1, output);
            write_tree(right, depth + 1, output);
        }
    }
}
