//! Colored formatter implementation with terminal color support

use super::formatter::{FormattingOptions, OutputFormatter, PlainFormatter};
use crate::{
    config::{ValidationLevel, ValidationWarning},
    error::{Result, ValidationFailure},
    models::AppConfig,
};
use colored::*;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        let plain_formatter = PlainFormatter::new(options.clone());
        Self {
            plain_formatter,
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    /// Bold and colored when colors are enabled
    fn emphasize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color).bold()
        } else {
            text.normal()
        }
    }

    fn level_color(&self, level: ValidationLevel) -> Color {
        match level {
            ValidationLevel::Info => self.color_scheme.info,
            ValidationLevel::Warning => self.color_scheme.warning,
        }
    }

    /// Color whole table lines; cells are laid out uncolored so widths hold
    fn colorize_table(&self, table: &str) -> String {
        table
            .lines()
            .enumerate()
            .map(|(idx, line)| {
                if line.starts_with('+') {
                    self.colorize(line, self.color_scheme.muted).to_string()
                } else if idx == 1 || (!self.options.table_borders && idx == 0) {
                    self.bold(line).to_string()
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let border = "=".repeat(title.len() + 4);
        Ok(format!(
            "{}\n  {}  \n{}",
            self.colorize(&border, self.color_scheme.header),
            self.emphasize(title, self.color_scheme.header),
            self.colorize(&border, self.color_scheme.header)
        ))
    }

    fn format_config_summary(&self, config: &AppConfig) -> Result<String> {
        let table = self.plain_formatter.create_table(
            &self.plain_formatter.config_table(),
            &PlainFormatter::config_rows(config),
        );

        let mode = if config.mode.is_production() {
            self.emphasize(config.mode.as_str(), self.color_scheme.warning)
        } else {
            self.colorize(config.mode.as_str(), self.color_scheme.info)
        };

        Ok(format!("{} {}\n{}", self.bold("Mode:"), mode, self.colorize_table(&table)))
    }

    fn format_warnings(&self, warnings: &[ValidationWarning]) -> Result<String> {
        let lines: Vec<String> = warnings
            .iter()
            .map(|w| {
                format!(
                    "{} {}",
                    self.colorize(&format!("[{}]", w.level.as_str()), self.level_color(w.level)),
                    w.message
                )
            })
            .collect();
        Ok(lines.join("\n"))
    }

    fn format_failure(&self, failure: &ValidationFailure) -> Result<String> {
        let lines: Vec<String> = failure
            .violations()
            .iter()
            .map(|v| {
                format!(
                    "  {} {}: {}",
                    self.colorize("✗", self.color_scheme.error),
                    self.bold(&v.field),
                    v.describe()
                )
            })
            .collect();
        Ok(lines.join("\n"))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("{} {}", self.emphasize("✗ ERROR:", self.color_scheme.error), error))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("{} {}", self.emphasize("✓", self.color_scheme.success), message))
    }
}
