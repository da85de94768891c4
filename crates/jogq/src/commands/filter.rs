//! Filter command implementation.
//!
//! Compiles a query against a field whitelist and prints the matching records.

use std::path::PathBuf;

use jogq_core::filter::{compile, filter_records, par_filter, EvalResult, FilterExpr};
use jogq_core::{FieldWhitelist, Record};

use super::input::read_records;
use super::{CommandContext, Result};
use crate::cli::FieldArgs;
use crate::output::helpers::DateFormat;
use crate::output::{format_records_json, format_records_table, format_summary, FilterOutput};

/// Options for the filter command.
#[derive(Debug, Default)]
pub struct FilterOptions {
    /// Query text.
    pub query: String,
    /// Input file; stdin when unset.
    pub input: Option<PathBuf>,
    /// Whitelist selection.
    pub fields: FieldArgs,
    /// Force parallel evaluation.
    pub parallel: bool,
    /// Limit number of printed records.
    pub limit: Option<usize>,
    /// Reverse the order of matched records.
    pub reverse: bool,
}

/// Executes the filter command.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the query does not
/// compile, or the query fails on any record.
pub fn execute(ctx: &CommandContext, opts: &FilterOptions) -> Result<()> {
    let records = read_records(opts.input.as_deref())?;

    // Without an explicit whitelist, any field present in the data may be queried.
    let whitelist = match ctx.whitelist(&opts.fields)? {
        Some(whitelist) => whitelist,
        None => FieldWhitelist::from_records(&records),
    };
    let expr = compile(&opts.query, &whitelist)?;

    let parallel = opts.parallel || records.len() >= ctx.config.parallel_threshold();
    let mut matched = run_filter(&expr, &records, parallel)?;
    let matched_count = matched.len();

    if opts.reverse {
        matched.reverse();
    }
    if let Some(limit) = opts.limit {
        matched.truncate(limit);
    }

    if ctx.json_output {
        let output = FilterOutput {
            query: expr.to_string(),
            total: records.len(),
            matched: matched_count,
            records: &matched,
        };
        println!("{}", format_records_json(&output)?);
    } else if !ctx.quiet {
        let date_format = DateFormat::from_config(ctx.config.output.date_format.as_deref());
        print!("{}", format_records_table(&matched, date_format, ctx.use_colors));
        if ctx.verbose {
            eprint!("{}", format_summary(matched.len(), matched_count, records.len()));
        }
    }

    Ok(())
}

/// Applies `expr` sequentially or on the rayon pool.
fn run_filter<'r>(
    expr: &FilterExpr,
    records: &'r [Record],
    parallel: bool,
) -> EvalResult<Vec<&'r Record>> {
    tracing::debug!(records = records.len(), parallel, "filtering");
    if parallel {
        par_filter(expr, records)
    } else {
        filter_records(expr, records)
    }
}
