//! Command dispatch module for routing CLI commands to their handlers.

use crate::cli::{Commands, ConfigCommands};
use crate::commands::{self, CommandContext, CommandError, Result};

/// Whether `command` reads the configuration file.
///
/// The rest still run when the file is broken, so that `jogq config path`
/// can locate it.
pub fn needs_config(command: &Option<Commands>) -> bool {
    match command {
        Some(Commands::Config { command }) => !matches!(command, Some(ConfigCommands::Path)),
        Some(Commands::Completions { .. }) | None => false,
        Some(_) => true,
    }
}

/// Runs the handler for `command`.
pub fn dispatch(ctx: &CommandContext, command: &Option<Commands>) -> Result<()> {
    match command {
        Some(Commands::Filter {
            query,
            input,
            fields,
            parallel,
            limit,
            reverse,
        }) => {
            let opts = commands::filter::FilterOptions {
                query: query.clone(),
                input: input.clone(),
                fields: fields.clone(),
                parallel: *parallel,
                limit: *limit,
                reverse: *reverse,
            };
            commands::filter::execute(ctx, &opts)
        }
        Some(Commands::Check { query, fields }) => {
            let opts = commands::check::CheckOptions {
                query: query.clone(),
                fields: fields.clone(),
            };
            commands::check::execute(ctx, &opts)
        }
        Some(Commands::Report { input, date, query }) => {
            let opts = commands::report::ReportOptions {
                input: input.clone(),
                date: *date,
                query: query.clone(),
            };
            commands::report::execute(ctx, &opts)
        }
        Some(Commands::Config { command }) => dispatch_config(ctx, command),
        Some(Commands::Completions { shell }) => {
            commands::completions::execute(shell).map_err(CommandError::Io)
        }
        None => {
            if !ctx.quiet {
                println!("jogq - filter jog and user records");
                println!("Use --help for usage information");
            }
            Ok(())
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}
