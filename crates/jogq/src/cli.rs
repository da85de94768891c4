//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the jogq CLI.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

/// jogq - Filter jog and user records with the `q` query language
#[derive(Parser, Debug)]
#[command(name = "jogq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter records read from a JSON array
    #[command(alias = "f")]
    Filter {
        /// Query, e.g. "(date eq '2016-05-01') AND (distance gt 20)"
        query: String,

        /// Input file (default: stdin, or "-")
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        fields: FieldArgs,

        /// Evaluate on all cores
        #[arg(long)]
        parallel: bool,

        /// Limit number of printed records
        #[arg(long)]
        limit: Option<usize>,

        /// Reverse the order of matched records
        #[arg(long)]
        reverse: bool,
    },

    /// Compile a query and print its canonical form
    #[command(alias = "c")]
    Check {
        /// Query to compile
        query: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Weekly average speed and distance over jog records
    #[command(alias = "r")]
    Report {
        /// Input file (default: stdin, or "-")
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Any day of the week to report on (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Only include jogs matching this query
        #[arg(long)]
        query: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Options that decide which field names a query may reference.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct FieldArgs {
    /// Built-in field set to validate against
    #[arg(short, long, value_enum)]
    pub schema: Option<Schema>,

    /// Explicit comma-separated list of allowed fields
    #[arg(long, value_delimiter = ',', conflicts_with = "schema")]
    pub fields: Vec<String>,
}

/// Built-in record schemas
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schema {
    Jogs,
    Users,
}

impl Schema {
    /// Parses a schema name as stored in the config file.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "jogs" => Some(Schema::Jogs),
            "users" => Some(Schema::Users),
            _ => None,
        }
    }
}

/// Supported shells for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}
