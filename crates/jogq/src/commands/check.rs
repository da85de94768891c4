//! Check command implementation.
//!
//! Compiles a query without reading any records.

use jogq_core::filter::compile;
use jogq_core::schema::{JOG_FIELDS, USER_FIELDS};
use jogq_core::FieldWhitelist;

use super::{CommandContext, Result};
use crate::cli::FieldArgs;
use crate::output::{format_check_json, format_check_table, CheckOutput};

/// Options for the check command.
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// Query text.
    pub query: String,
    /// Whitelist selection.
    pub fields: FieldArgs,
}

/// Executes the check command.
///
/// With no whitelist selected the query may reference any field of either
/// built-in schema.
///
/// # Errors
///
/// Returns `CommandError::Syntax` if the query does not compile.
pub fn execute(ctx: &CommandContext, opts: &CheckOptions) -> Result<()> {
    let whitelist = match ctx.whitelist(&opts.fields)? {
        Some(whitelist) => whitelist,
        None => FieldWhitelist::new(JOG_FIELDS.iter().chain(USER_FIELDS).copied()),
    };
    let filter = compile(&opts.query, &whitelist)?;

    if ctx.json_output {
        let output = CheckOutput::new(&opts.query, &filter);
        println!("{}", format_check_json(&output)?);
    } else if !ctx.quiet {
        print!("{}", format_check_table(&filter, ctx.use_colors));
    }

    Ok(())
}
