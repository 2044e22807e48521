//! Main application orchestration and execution

use crate::{
    cli::{Cli, OutputFormat},
    config::{display_config_summary, global, ConfigParser, EnvManager, EnvSchema, LoadedConfig, ValidationLevel},
    error::{AppError, Result},
    log_debug, log_event, log_info,
    logging::{LogLevel, LogSettings, Logger, LoggerFactory},
    output::{OutputFormatter, OutputFormatterFactory},
};

const OPERATION: &str = "validate_environment";

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
    formatter: Box<dyn OutputFormatter>,
    loggers: LoggerFactory,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::config)?;

        Ok(Self {
            formatter: OutputFormatterFactory::from_cli(&cli),
            loggers: LoggerFactory::new(LogSettings::from_cli(&cli)),
            cli,
        })
    }

    /// Run the application
    pub async fn run(self) -> Result<()> {
        let logger = self.loggers.create_logger("ENV").await;
        log_debug!(logger, "{}", crate::version_string())
            .field("session_id", self.loggers.session_id())
            .log()
            .await;

        if self.cli.should_show_topic_help() {
            println!("{}", self.cli.display_help());
            return Ok(());
        }

        if let Some(path) = &self.cli.write_example {
            EnvManager::save_example_env_file(path, &EnvSchema::records_app())?;
            log_info!(logger, "Wrote example env file")
                .field("path", path.display().to_string())
                .log()
                .await;
            println!(
                "{}",
                self.formatter
                    .format_success(&format!("Example environment written to {}", path.display()))?
            );
            return Ok(());
        }

        let correlation_id = logger.start_operation(OPERATION).await;

        match ConfigParser::new(self.cli.clone()).parse() {
            Ok(loaded) => {
                let result = self.accept(&logger, loaded).await;
                logger.end_operation(&correlation_id, OPERATION, result.is_ok()).await;
                result
            }
            Err(error) => {
                self.reject(&logger, &error).await?;
                logger.end_operation(&correlation_id, OPERATION, false).await;
                Err(error)
            }
        }
    }

    /// Report a successful pass and install the configuration
    async fn accept(&self, logger: &Logger, loaded: LoadedConfig) -> Result<()> {
        if let Some(merge) = &loaded.env_file {
            log_debug!(logger, "Merged env file")
                .field("path", merge.path.display().to_string())
                .field("applied", &merge.applied)
                .field("shadowed", &merge.shadowed)
                .log()
                .await;
        }

        logger.add_context_field("mode".to_string(), loaded.config.mode).await;

        for warning in &loaded.warnings {
            log_event!(logger, advisory_log_level(warning.level), "{}", warning.message)
                .field("advisory", warning.level)
                .log()
                .await;
        }

        if logger.would_log(LogLevel::Debug) {
            log_debug!(logger, "Configuration summary")
                .field("summary", display_config_summary(&loaded.config))
                .log()
                .await;
        }

        println!("{}", self.formatter.format_report(&loaded)?);

        let installed = global::install(loaded.config)?;
        log_info!(logger, "Environment validated")
            .field("client_variables", installed.client.len())
            .field("warnings", loaded.warnings.len())
            .log()
            .await;

        Ok(())
    }

    /// Log a failed pass; JSON consumers also get the failure on stdout.
    ///
    /// The text report goes to stderr through [`ErrorReporter`](crate::error::ErrorReporter).
    async fn reject(&self, logger: &Logger, error: &AppError) -> Result<()> {
        if let Some(failure) = error.validation_failure() {
            for violation in failure.violations() {
                log_debug!(logger, "Rejected variable").violation(violation).log().await;
            }

            if self.cli.format == OutputFormat::Json {
                println!("{}", self.formatter.format_failure_report(failure)?);
            }
        }

        log_debug!(logger, "Environment check failed").error_info(error).log().await;
        Ok(())
    }
}

/// Log level for an advisory; warnings stay visible at the default level
fn advisory_log_level(level: ValidationLevel) -> LogLevel {
    match level {
        ValidationLevel::Info => LogLevel::Debug,
        ValidationLevel::Warning => LogLevel::Warn,
    }
}
