//! Error handling for the environment gate

pub mod violation;

pub use violation::{FieldViolation, ValidationFailure, ViolationKind};

use crate::cli::OutputFormat;
use crate::output::OutputFormatterFactory;
use thiserror::Error;

const VALIDATION_SUGGESTION: &str = "Suggestion: Fix every listed variable in your environment or .env file, then start again. Run with --help-topic env for the full list.";

/// Custom error types for the environment gate
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (schema, options, .env handling)
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more environment variables failed validation
    #[error("Environment validation failed. {0}")]
    Validation(#[from] ValidationFailure),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (modes, log levels, JSON, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Aggregate validation failure, if this is one
    pub fn validation_failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Validation(failure) => Some(failure),
            _ => None,
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check the schema declaration and command line options.", msg)
            }
            Self::Validation(failure) => {
                format!("{}\n\n{}", failure, VALIDATION_SUGGESTION)
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check the .env path and file permissions.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse input: {}\n\nSuggestion: Check the format of the value you passed.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,
            Self::Io(_) => 5,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Io(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::parse(format!("URL parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON error: {}", error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<regex::Error> for AppError {
    fn from(error: regex::Error) -> Self {
        Self::internal(format!("Pattern error: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let original_error = e.into();
            let context = f();
            match original_error {
                AppError::Io(msg) => AppError::Io(format!("{}: {}", context, msg)),
                AppError::Config(msg) => AppError::Config(format!("{}: {}", context, msg)),
                other => AppError::internal(format!("{}: {}", context, other)),
            }
        })
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.with_context(|| message.to_string())
    }
}

/// Error reporter for user feedback on stderr
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.render(error));
    }

    /// Render the report without printing it.
    ///
    /// Validation failures use the text formatter's failure report, so the
    /// listing matches what `--format json` emits field for field.
    pub fn render(&self, error: &AppError) -> String {
        let mut output = match error.validation_failure() {
            Some(failure) => OutputFormatterFactory::create_formatter(OutputFormat::Text, self.use_color, self.verbose)
                .format_failure_report(failure)
                .unwrap_or_else(|_| error.format_for_console(self.use_color)),
            None => error.format_for_console(self.use_color),
        };

        if self.verbose {
            output.push_str("\n\n");
            match error.validation_failure() {
                // Violations are already listed above
                Some(_) => output.push_str(VALIDATION_SUGGESTION),
                None => output.push_str(&error.user_friendly_message()),
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_failure() -> ValidationFailure {
        ValidationFailure::new(vec![
            FieldViolation::missing("JWT_SECRET"),
            FieldViolation::invalid_enum("NODE_ENV", "staging", &["development", "test", "production"]),
        ])
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(AppError::config("x").category(), "CONFIG");
        assert_eq!(AppError::from(sample_failure()).category(), "VALIDATION");
        assert_eq!(AppError::io("x").category(), "IO");
        assert_eq!(AppError::parse("x").category(), "PARSE");
        assert_eq!(AppError::internal("x").category(), "INTERNAL");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::from(sample_failure()).exit_code(), 1);
        assert_eq!(AppError::config("x").exit_code(), 1);
        assert_eq!(AppError::io("x").exit_code(), 5);
        assert_eq!(AppError::internal("x").exit_code(), 99);
    }

    #[test]
    fn test_validation_error_display_lists_fields() {
        let error = AppError::from(sample_failure());
        let text = error.to_string();
        assert!(text.contains("JWT_SECRET"));
        assert!(text.contains("NODE_ENV"));
        assert!(error.validation_failure().is_some());
    }

    #[test]
    fn test_from_conversions() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(AppError::from(io_err), AppError::Io(_)));

        let url_err = url::Url::parse("not-a-url").unwrap_err();
        assert!(matches!(AppError::from(url_err), AppError::Parse(_)));
    }

    #[test]
    fn test_error_context_keeps_category() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        let error = result.context("Failed to read .env").unwrap_err();
        assert!(matches!(error, AppError::Io(_)));
        assert!(error.to_string().contains("Failed to read .env"));
    }

    #[test]
    fn test_reporter_renders_each_violation() {
        let reporter = ErrorReporter::new(false, false);
        let rendered = reporter.render(&AppError::from(sample_failure()));

        assert!(rendered.starts_with("ERROR: Invalid environment variables (2)"));
        assert!(rendered.contains("| JWT_SECRET"));
        assert!(rendered.contains("required but not set"));
        assert!(rendered.contains("| NODE_ENV"));
    }

    #[test]
    fn test_reporter_matches_formatter_failure_report() {
        let failure = sample_failure();
        let expected = OutputFormatterFactory::create_formatter(OutputFormat::Text, false, false)
            .format_failure_report(&failure)
            .unwrap();

        let rendered = ErrorReporter::new(false, false).render(&AppError::from(failure));
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_reporter_verbose_adds_suggestion() {
        let reporter = ErrorReporter::new(false, true);
        let rendered = reporter.render(&AppError::config("duplicate field"));
        assert!(rendered.contains("[CONFIG]"));
        assert!(rendered.contains("Suggestion:"));
    }
}
