//! Command implementations for the jogq CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod check;
pub mod completions;
pub mod config;
pub mod filter;
pub mod input;
pub mod report;

use jogq_core::filter::{EvalError, SyntaxError};
use jogq_core::{FieldWhitelist, RecordError, ReportError};

use crate::cli::{Cli, FieldArgs, Schema};
use self::config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The query failed to compile.
    #[error("invalid query: {0}")]
    Syntax(#[from] SyntaxError),

    /// The query failed on one of the records.
    #[error("evaluation failed: {0}")]
    Eval(#[from] EvalError),

    /// The input was not a JSON array of records.
    #[error("invalid input: {0}")]
    Record(#[from] RecordError),

    /// The weekly report could not be computed.
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Loaded configuration file.
    pub config: Config,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and configuration.
    ///
    /// Colors are on unless disabled by `--no-color`, the `NO_COLOR`
    /// environment variable or `output.color = false`.
    pub fn from_cli(cli: &Cli, config: Config) -> Self {
        let use_colors = !cli.no_color
            && std::env::var_os("NO_COLOR").is_none()
            && config.output.color.unwrap_or(true);
        Self {
            json_output: cli.json,
            use_colors,
            quiet: cli.quiet,
            verbose: cli.verbose,
            config,
        }
    }

    /// Resolves the field whitelist for a query.
    ///
    /// Priority: explicit `--fields`, then `--schema`, then the configured
    /// default schema. Returns `None` when none of them is set, leaving the
    /// fallback to the caller.
    pub fn whitelist(&self, args: &FieldArgs) -> Result<Option<FieldWhitelist>> {
        if !args.fields.is_empty() {
            let fields = args.fields.iter().map(|f| f.trim()).filter(|f| !f.is_empty());
            return Ok(Some(FieldWhitelist::new(fields)));
        }

        let schema = match args.schema {
            Some(schema) => Some(schema),
            None => self.config.default_schema()?,
        };
        Ok(schema.map(|schema| match schema {
            Schema::Jogs => FieldWhitelist::jogs(),
            Schema::Users => FieldWhitelist::users(),
        }))
    }
}
