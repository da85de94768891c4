//! Report command implementation.
//!
//! Computes average speed and distance for the week containing a date.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use jogq_core::filter::{compile, filter};
use jogq_core::{FieldWhitelist, WeeklyReport};

use super::input::read_records;
use super::{CommandContext, Result};
use crate::output::{format_report_json, format_report_table};

/// Options for the report command.
#[derive(Debug, Default)]
pub struct ReportOptions {
    /// Input file; stdin when unset.
    pub input: Option<PathBuf>,
    /// Day within the week to report on; today when unset.
    pub date: Option<NaiveDate>,
    /// Optional query restricting which jogs count.
    pub query: Option<String>,
}

/// Executes the report command.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the query is invalid or
/// fails on a record, or the week's jogs cannot be averaged.
pub fn execute(ctx: &CommandContext, opts: &ReportOptions) -> Result<()> {
    let mut records = read_records(opts.input.as_deref())?;

    if let Some(query) = &opts.query {
        let expr = compile(query, &FieldWhitelist::jogs())?;
        records = filter(&expr, records)?;
    }

    let date = opts.date.unwrap_or_else(|| Local::now().date_naive());
    let report = WeeklyReport::for_date(date, &records)?;

    if ctx.json_output {
        println!("{}", format_report_json(&report)?);
    } else if !ctx.quiet {
        print!("{}", format_report_table(&report, ctx.use_colors));
    }

    Ok(())
}
