//! Output formatting and display system
//!
//! Renders the result of a validation pass as plain text, colored text or a
//! JSON document.

mod colored;
mod formatter;
mod json;

pub use self::colored::{ColorScheme, ColoredFormatter};
pub use formatter::{Column, FormattingOptions, OutputFormatter, PlainFormatter, RowData, TableFormat};
pub use json::JsonFormatter;

use crate::cli::{Cli, OutputFormat};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on output format and color preferences
    pub fn create_formatter(format: OutputFormat, enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            ..FormattingOptions::default()
        };

        match format {
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::Text if enable_color => Box::new(ColoredFormatter::new(options)),
            OutputFormat::Text => Box::new(PlainFormatter::new(options)),
        }
    }

    /// Formatter matching the command-line flags
    pub fn from_cli(cli: &Cli) -> Box<dyn OutputFormatter> {
        Self::create_formatter(cli.format, cli.use_colors(), cli.verbose)
    }
}
