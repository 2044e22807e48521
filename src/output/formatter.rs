//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation with table formatting capabilities.

use crate::{
    config::{LoadedConfig, ValidationWarning},
    error::{AppError, Result, ValidationFailure},
    models::AppConfig,
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the validated configuration, secrets masked
    fn format_config_summary(&self, config: &AppConfig) -> Result<String>;

    /// Format advisory warnings
    fn format_warnings(&self, warnings: &[ValidationWarning]) -> Result<String>;

    /// Format every violation of a failed pass
    fn format_failure(&self, failure: &ValidationFailure) -> Result<String>;

    fn format_error(&self, error: &str) -> Result<String>;

    fn format_success(&self, message: &str) -> Result<String>;

    /// Complete report for a successful pass
    fn format_report(&self, loaded: &LoadedConfig) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.format_header("Environment Check")?);
        output.push_str("\n\n");
        output.push_str(&self.format_config_summary(&loaded.config)?);
        output.push('\n');

        if !loaded.warnings.is_empty() {
            output.push('\n');
            output.push_str(&self.format_warnings(&loaded.warnings)?);
            output.push('\n');
        }

        output.push('\n');
        output.push_str(&self.format_success(&format!("Environment is valid for {} mode", loaded.config.mode))?);
        Ok(output)
    }

    /// Complete report for a failed pass
    fn format_failure_report(&self, failure: &ValidationFailure) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.format_error(&format!("Invalid environment variables ({})", failure.len()))?);
        output.push('\n');
        output.push_str(&self.format_failure(failure)?);
        Ok(output)
    }
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Enable verbose mode with detailed information
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Maximum width of a value cell
    pub max_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
            max_width: 80,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    pub columns: Vec<Column>,
    pub show_borders: bool,
    pub show_header: bool,
    pub min_column_width: usize,
    pub max_column_width: usize,
}

/// Column definition for table formatting; cells are left-aligned
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub min_width: usize,
    pub max_width: usize,
}

impl Column {
    pub fn new(header: &str, min_width: usize, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            min_width,
            max_width,
        }
    }
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    /// Table layout for the validated configuration
    pub(crate) fn config_table(&self) -> TableFormat {
        TableFormat {
            columns: vec![
                Column::new("Variable", 12, 40),
                Column::new("Exposure", 8, 8),
                Column::new("Value", 8, self.options.max_width),
            ],
            show_borders: self.options.table_borders,
            show_header: true,
            min_column_width: 8,
            max_column_width: self.options.max_width,
        }
    }

    /// Table layout for a failed pass
    pub(crate) fn failure_table(&self) -> TableFormat {
        TableFormat {
            columns: vec![
                Column::new("Variable", 12, 40),
                Column::new("Problem", 10, self.options.max_width),
            ],
            show_borders: self.options.table_borders,
            show_header: true,
            min_column_width: 8,
            max_column_width: self.options.max_width,
        }
    }

    /// Rows of the configuration table
    pub(crate) fn config_rows(config: &AppConfig) -> Vec<RowData> {
        let server = config
            .server
            .display_entries()
            .into_iter()
            .map(|(name, value)| vec![name.to_string(), "server".to_string(), value]);
        let client = config
            .client
            .iter()
            .map(|(name, value)| vec![name.to_string(), "client".to_string(), value.to_string()]);
        server.chain(client).collect()
    }

    /// Rows of the failure table
    pub(crate) fn failure_rows(failure: &ValidationFailure) -> Vec<RowData> {
        failure
            .violations()
            .iter()
            .map(|v| vec![v.field.clone(), v.describe()])
            .collect()
    }

    /// Create a table with the given format and data
    pub(crate) fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let column_widths = self.calculate_column_widths(format, rows);

        let mut output = String::new();

        if format.show_header && !format.columns.is_empty() {
            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }

            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&self.create_row(&headers, &column_widths, format));
            output.push('\n');

            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }
        }

        for row in rows {
            output.push_str(&self.create_row(row, &column_widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&column_widths));
        }

        output.trim_end().to_string()
    }

    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        let num_columns = format
            .columns
            .len()
            .max(rows.iter().map(|r| r.len()).max().unwrap_or(0));

        (0..num_columns)
            .map(|col_idx| {
                let column = format.columns.get(col_idx);
                let mut width = column
                    .map(|c| c.min_width.max(c.header.chars().count()))
                    .unwrap_or(format.min_column_width);

                for row in rows {
                    if let Some(cell) = row.get(col_idx) {
                        width = width.max(cell.chars().count());
                    }
                }

                width.min(column.map_or(format.max_column_width, |c| c.max_width))
            })
            .collect()
    }

    fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (cell, &width) in data.iter().zip(widths.iter()) {
            let padded_cell = self.fit_text(cell, width);

            if format.show_borders {
                row.push(' ');
            }
            row.push_str(&padded_cell);
            if format.show_borders {
                row.push_str(" |");
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::new();

        if !widths.is_empty() {
            border.push('+');
            for &width in widths {
                border.push_str(&"-".repeat(width + 2));
                border.push('+');
            }
        }

        border
    }

    /// Pad text to the column width, truncating with `...` when needed
    fn fit_text(&self, text: &str, width: usize) -> String {
        let len = text.chars().count();
        if len > width {
            let keep = width.saturating_sub(3);
            return format!("{}...", text.chars().take(keep).collect::<String>());
        }

        format!("{}{}", text, " ".repeat(width - len))
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.len() + 4);

        writeln!(output, "{}", border).map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        writeln!(output, "  {}  ", title).map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        write!(output, "{}", border).map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;

        Ok(output)
    }

    fn format_config_summary(&self, config: &AppConfig) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Mode: {}", config.mode)
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        output.push_str(&self.create_table(&self.config_table(), &Self::config_rows(config)));

        if config.client.is_empty() && self.options.verbose_mode {
            output.push_str("\nNo client variables declared.");
        }

        Ok(output)
    }

    fn format_warnings(&self, warnings: &[ValidationWarning]) -> Result<String> {
        let lines: Vec<String> = warnings.iter().map(ValidationWarning::format).collect();
        Ok(lines.join("\n"))
    }

    fn format_failure(&self, failure: &ValidationFailure) -> Result<String> {
        Ok(self.create_table(&self.failure_table(), &Self::failure_rows(failure)))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("SUCCESS: {}", message))
    }
}
