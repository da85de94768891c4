//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/jogq/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};
use crate::cli::Schema;

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Record count from which `filter` evaluates in parallel unless configured.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 10_000;

/// Accepted values for `output.date_format`.
const DATE_FORMATS: [&str; 3] = ["iso", "short", "date"];

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Query settings.
    #[serde(default)]
    pub query: QueryConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            output: OutputConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

impl Config {
    /// The configured default schema, if any.
    pub fn default_schema(&self) -> Result<Option<Schema>> {
        match self.query.default_schema.as_deref() {
            None => Ok(None),
            Some(name) => Schema::from_name(name).map(Some).ok_or_else(|| {
                CommandError::Config(format!(
                    "Invalid query.default_schema value '{name}'. Valid values: jogs, users"
                ))
            }),
        }
    }

    /// Record count from which filtering runs in parallel.
    pub fn parallel_threshold(&self) -> usize {
        self.query
            .parallel_threshold
            .unwrap_or(DEFAULT_PARALLEL_THRESHOLD)
    }
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    /// Timestamp format in tables: "iso", "short" or "date".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

/// Query configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Schema used when neither `--schema` nor `--fields` is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_schema: Option<String>,

    /// Minimum number of records for parallel evaluation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_threshold: Option<usize>,
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/jogq/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("jogq"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("jogq"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    // Check for override env var first
    if let Ok(path) = env::var("JOGQ_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {e}")))?;

    let config: Config = toml::from_str(&content).map_err(|e| {
        CommandError::Config(format!("Failed to parse config {}: {e}", path.display()))
    })?;

    tracing::debug!(path = %path.display(), version = config.version, "loaded config");
    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    // Version 1 is the initial layout.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {e}"))
        })?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {e}")))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {e}")))?;

    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = &ctx.config;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{header}\n");
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            println!("[output]");
            if let Some(color) = config.output.color {
                println!("  color: {color}");
            }
            if let Some(ref format) = config.output.date_format {
                println!("  date_format: {format}");
            }

            println!("\n[query]");
            if let Some(ref schema) = config.query.default_schema {
                println!("  default_schema: {schema}");
            }
            if let Some(threshold) = config.query.parallel_threshold {
                println!("  parallel_threshold: {threshold}");
            }
        } else {
            println!("(No config file exists. Run 'jogq config set <key> <value>' to create one.)");
        }
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Applies `key = value` to `config`, validating the value.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key.split_once('.') {
        Some(("output", "color")) => {
            config.output.color = Some(parse_bool(value)?);
        }
        Some(("output", "date_format")) => {
            if !DATE_FORMATS.contains(&value) {
                return Err(CommandError::Config(format!(
                    "Invalid date_format value '{value}'. Valid values: {}",
                    DATE_FORMATS.join(", ")
                )));
            }
            config.output.date_format = Some(value.to_string());
        }
        Some(("query", "default_schema")) => {
            if Schema::from_name(value).is_none() {
                return Err(CommandError::Config(format!(
                    "Invalid default_schema value '{value}'. Valid values: jogs, users"
                )));
            }
            config.query.default_schema = Some(value.to_string());
        }
        Some(("query", "parallel_threshold")) => {
            let threshold = value.parse::<usize>().map_err(|_| {
                CommandError::Config(format!(
                    "Invalid parallel_threshold value '{value}'. Expected a non-negative integer"
                ))
            })?;
            config.query.parallel_threshold = Some(threshold);
        }
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{key}'. Valid keys: output.color, output.date_format, query.default_schema, query.parallel_threshold"
            )));
        }
    }
    Ok(())
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;

    apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, opts.value);
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{s}'. Use true/false, yes/no, 1/0, or on/off"
        ))),
    }
}
