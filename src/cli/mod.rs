//! Command-line interface module with topic help

pub mod help;

pub use help::HelpSystem;

use crate::logging::LogLevel;
use crate::models::DeploymentMode;
use clap::{parser::ValueSource, CommandFactory, FromArgMatches, Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// One JSON document on stdout
    Json,
}

/// Records Env - validate the records application environment before startup
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "records-env")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Read variables from this .env file (defaults to ./.env when present)
    #[arg(long, value_name = "PATH", env = "RECORDS_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Do not read any .env file
    #[arg(long)]
    pub no_env_file: bool,

    /// Deployment mode to validate against (defaults to NODE_ENV)
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<DeploymentMode>,

    /// Require a real URL for NEXTAUTH_URL even on the hosting platform
    #[arg(long)]
    pub strict_platform_url: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Log level (trace, debug, info, warn, error, fatal)
    #[arg(long, value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,

    /// Write an example .env file to PATH and exit
    #[arg(long, value_name = "PATH")]
    pub write_example: Option<PathBuf>,

    /// Show help for specific topic (env, modes, platform)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,

    /// Set when `env_file` came from `RECORDS_ENV_FILE` rather than the flag
    #[arg(skip)]
    pub env_file_from_env: bool,
}

impl Cli {
    /// Parse the process arguments, exiting with clap's message on error
    pub fn parse_args() -> Self {
        Self::try_parse_args_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parse arguments and remember where `--env-file` got its value
    pub fn try_parse_args_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        let mut cli = Self::from_arg_matches(&matches)?;
        cli.env_file_from_env = matches.value_source("env_file") == Some(ValueSource::EnvVariable);
        Ok(cli)
    }

    /// Validate CLI arguments for conflicts.
    ///
    /// A path inherited from `RECORDS_ENV_FILE` yields to `--no-env-file`.
    pub fn validate(&self) -> Result<(), String> {
        if self.env_file.is_some() && !self.env_file_from_env && self.no_env_file {
            return Err("Cannot specify both --env-file and --no-env-file".to_string());
        }

        Ok(())
    }

    /// Check if help should be displayed for a specific topic
    pub fn should_show_topic_help(&self) -> bool {
        self.help_topic.is_some()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.no_color || self.format == OutputFormat::Json {
            false
        } else {
            supports_color()
        }
    }

    /// Effective log level for this invocation
    pub fn effective_log_level(&self) -> LogLevel {
        if let Some(level) = self.log_level {
            level
        } else if self.debug {
            LogLevel::Debug
        } else if self.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        }
    }

    /// Display help for the specified topic
    pub fn display_help(&self) -> String {
        let help_system = HelpSystem::new();
        let use_colors = self.use_colors();
        let topic = self.help_topic.as_deref().unwrap_or_default();

        help_system.display_topic_help(topic, use_colors).unwrap_or_else(|| {
            format!(
                "Unknown help topic: '{}'\n\nAvailable topics: {}\n",
                topic,
                HelpSystem::TOPICS.join(", ")
            )
        })
    }
}

fn parse_mode(s: &str) -> Result<DeploymentMode, String> {
    s.parse::<DeploymentMode>().map_err(|e| e.to_string())
}

fn parse_log_level(s: &str) -> Result<LogLevel, String> {
    s.parse::<LogLevel>().map_err(|e| e.to_string())
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        crate::defaults::DEFAULT_ENABLE_COLOR
    }
    #[cfg(not(unix))]
    {
        false
    }
}
